use thiserror::Error;

use super::status::{DeliveryTransitionError, OrderTransitionError};

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<OrderTransitionError> for DomainError {
    fn from(e: OrderTransitionError) -> Self {
        DomainError::Conflict(e.to_string())
    }
}

impl From<DeliveryTransitionError> for DomainError {
    fn from(e: DeliveryTransitionError) -> Self {
        DomainError::Conflict(e.to_string())
    }
}
