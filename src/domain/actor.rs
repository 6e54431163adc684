use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Owner,
    Courier,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Owner => "owner",
            Role::Courier => "courier",
            Role::Customer => "customer",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "owner" => Ok(Role::Owner),
            "courier" => Ok(Role::Courier),
            "customer" => Ok(Role::Customer),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// The acting user, passed explicitly into every operation instead of being
/// read from ambient session state. The session provider itself lives
/// outside this service; here we only care about identity and role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    /// Admin and owner staff manage orders; couriers and customers do not.
    pub fn is_back_office(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Owner)
    }

    pub fn require_back_office(&self, action: &str) -> Result<(), DomainError> {
        if self.is_back_office() {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "{} requires an admin or owner, acting role is {}",
                action,
                self.role.as_str()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_office_roles() {
        let id = Uuid::new_v4();
        assert!(Actor::new(id, Role::Admin).is_back_office());
        assert!(Actor::new(id, Role::Owner).is_back_office());
        assert!(!Actor::new(id, Role::Courier).is_back_office());
        assert!(!Actor::new(id, Role::Customer).is_back_office());
    }

    #[test]
    fn role_strings_round_trip() {
        for role in [Role::Admin, Role::Owner, Role::Courier, Role::Customer] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("root".parse::<Role>().is_err());
    }
}
