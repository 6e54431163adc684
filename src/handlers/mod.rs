pub mod catalog;
pub mod deliveries;
pub mod orders;

use std::future::{ready, Ready};
use std::str::FromStr;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::domain::actor::{Actor, Role};
use crate::errors::AppError;

const ACTOR_ID_HEADER: &str = "X-Actor-Id";
const ACTOR_ROLE_HEADER: &str = "X-Actor-Role";

fn header<'r>(req: &'r HttpRequest, name: &str) -> Result<&'r str, AppError> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)
}

/// Extract the acting user from the `X-Actor-Id` / `X-Actor-Role` headers.
///
/// A session layer in front of this service would normally resolve these
/// from a cookie or token; the service itself only needs identity and role.
impl FromRequest for Actor {
    type Error = AppError;
    type Future = Ready<Result<Actor, AppError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let actor = (|| {
            let id =
                Uuid::from_str(header(req, ACTOR_ID_HEADER)?).map_err(|_| AppError::Unauthorized)?;
            let role = header(req, ACTOR_ROLE_HEADER)?
                .parse::<Role>()
                .map_err(|_| AppError::Unauthorized)?;
            Ok(Actor::new(id, role))
        })();
        ready(actor)
    }
}
