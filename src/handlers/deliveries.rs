use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::actor::Actor;
use crate::domain::order::DeliveryView;
use crate::domain::status::DeliveryStatus;
use crate::errors::AppError;
use crate::Deliveries;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDeliveryRequest {
    pub status: DeliveryStatus,
    /// URL of the proof-of-arrival photo, if the courier took one.
    pub arrival_photo: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeliveryResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub courier_id: Uuid,
    pub status: DeliveryStatus,
    pub dispatched_at: String,
    pub arrived_at: Option<String>,
    pub arrival_photo: Option<String>,
}

impl From<DeliveryView> for DeliveryResponse {
    fn from(d: DeliveryView) -> Self {
        DeliveryResponse {
            id: d.id,
            order_id: d.order_id,
            courier_id: d.courier_id,
            status: d.status,
            dispatched_at: d.dispatched_at.to_rfc3339(),
            arrived_at: d.arrived_at.map(|t| t.to_rfc3339()),
            arrival_photo: d.arrival_photo,
        }
    }
}

/// GET /deliveries
///
/// Staff see every delivery; a courier sees their own work queue.
#[utoipa::path(
    get,
    path = "/deliveries",
    responses(
        (status = 200, description = "List of deliveries", body = [DeliveryResponse]),
        (status = 403, description = "Customers cannot list deliveries"),
    ),
    tag = "deliveries"
)]
pub async fn list_deliveries(
    svc: web::Data<Deliveries>,
    actor: Actor,
) -> Result<HttpResponse, AppError> {
    let deliveries = web::block(move || svc.list_deliveries(actor))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<DeliveryResponse> = deliveries.into_iter().map(DeliveryResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// PATCH /deliveries/{id}
///
/// Marking a delivery arrived stamps the arrival time and completes the
/// parent order in the same transaction.
#[utoipa::path(
    patch,
    path = "/deliveries/{id}",
    params(("id" = Uuid, Path, description = "Delivery UUID")),
    request_body = UpdateDeliveryRequest,
    responses(
        (status = 200, description = "Delivery updated", body = DeliveryResponse),
        (status = 404, description = "Delivery not found"),
        (status = 409, description = "Delivery cannot move back from arrived"),
    ),
    tag = "deliveries"
)]
pub async fn update_delivery(
    svc: web::Data<Deliveries>,
    actor: Actor,
    path: web::Path<Uuid>,
    body: web::Json<UpdateDeliveryRequest>,
) -> Result<HttpResponse, AppError> {
    let delivery_id = path.into_inner();
    let body = body.into_inner();

    let delivery = web::block(move || {
        svc.update_delivery(actor, delivery_id, body.status, body.arrival_photo.as_deref())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(DeliveryResponse::from(delivery)))
}
