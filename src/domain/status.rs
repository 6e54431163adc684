use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Lifecycle status of an order.
///
/// `AwaitingCourier` is part of the status domain but no event produces it;
/// it is kept for compatibility with historical data, and requesting it as a
/// transition target is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    AwaitingConfirmation,
    Processing,
    AwaitingCourier,
    Shipped,
    Completed,
}

/// Status of a delivery record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    InTransit,
    Arrived,
}

/// Events that drive the order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEvent {
    /// Staff explicitly confirms the order.
    Confirmed,
    /// The customer uploaded payment proof.
    PaymentProofUploaded,
    /// A courier was assigned and a delivery record created.
    CourierAssigned,
    /// The courier marked the delivery as arrived.
    DeliveryArrived,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot apply {event:?} to an order in status {from}")]
pub struct OrderTransitionError {
    pub from: OrderStatus,
    pub event: OrderEvent,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot move a delivery from {from} to {to}")]
pub struct DeliveryTransitionError {
    pub from: DeliveryStatus,
    pub to: DeliveryStatus,
}

impl OrderStatus {
    /// Total transition function of the order lifecycle.
    ///
    /// Confirmation (explicit or via payment proof) is idempotent: applying
    /// it to an order that is already `Processing` yields `Processing`
    /// again. Every other pair of (status, event) not listed in the
    /// lifecycle table is an error. `Completed` is terminal.
    pub fn apply(self, event: OrderEvent) -> Result<OrderStatus, OrderTransitionError> {
        use OrderEvent::*;
        use OrderStatus::*;

        match (self, event) {
            (AwaitingConfirmation, Confirmed) => Ok(Processing),
            (AwaitingConfirmation, PaymentProofUploaded) => Ok(Processing),
            (Processing, Confirmed) => Ok(Processing),
            (Processing, PaymentProofUploaded) => Ok(Processing),
            (Processing, CourierAssigned) => Ok(Shipped),
            (Shipped, DeliveryArrived) => Ok(Completed),
            (from, event) => Err(OrderTransitionError { from, event }),
        }
    }

    /// Event corresponding to directly requesting `requested` as the new
    /// status. Only `Processing` can be requested directly (staff
    /// confirmation); `Shipped` and `Completed` arise solely from the
    /// courier-assignment and delivery-arrival operations, and the awaiting
    /// states cannot be re-entered.
    pub fn direct_request_event(requested: OrderStatus) -> Option<OrderEvent> {
        match requested {
            OrderStatus::Processing => Some(OrderEvent::Confirmed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::AwaitingConfirmation => "AWAITING_CONFIRMATION",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::AwaitingCourier => "AWAITING_COURIER",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Completed => "COMPLETED",
        }
    }
}

impl DeliveryStatus {
    /// Delivery transitions are one-way: `InTransit → Arrived`. Re-applying
    /// the current status is an idempotent no-op; moving back from
    /// `Arrived` is rejected.
    pub fn advance_to(self, to: DeliveryStatus) -> Result<DeliveryStatus, DeliveryTransitionError> {
        match (self, to) {
            (DeliveryStatus::InTransit, DeliveryStatus::Arrived) => Ok(DeliveryStatus::Arrived),
            (from, to) if from == to => Ok(to),
            (from, to) => Err(DeliveryTransitionError { from, to }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::InTransit => "IN_TRANSIT",
            DeliveryStatus::Arrived => "ARRIVED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status value: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AWAITING_CONFIRMATION" => Ok(OrderStatus::AwaitingConfirmation),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "AWAITING_COURIER" => Ok(OrderStatus::AwaitingCourier),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "COMPLETED" => Ok(OrderStatus::Completed),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl FromStr for DeliveryStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_TRANSIT" => Ok(DeliveryStatus::InTransit),
            "ARRIVED" => Ok(DeliveryStatus::Arrived),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_order_confirms_into_processing() {
        let next = OrderStatus::AwaitingConfirmation
            .apply(OrderEvent::Confirmed)
            .expect("legal transition");
        assert_eq!(next, OrderStatus::Processing);
    }

    #[test]
    fn payment_proof_also_advances_into_processing() {
        let next = OrderStatus::AwaitingConfirmation
            .apply(OrderEvent::PaymentProofUploaded)
            .expect("legal transition");
        assert_eq!(next, OrderStatus::Processing);
    }

    #[test]
    fn confirming_twice_is_idempotent() {
        let once = OrderStatus::AwaitingConfirmation
            .apply(OrderEvent::Confirmed)
            .unwrap();
        let twice = once.apply(OrderEvent::Confirmed).unwrap();
        assert_eq!(twice, OrderStatus::Processing);
    }

    #[test]
    fn courier_assignment_requires_processing() {
        assert_eq!(
            OrderStatus::Processing.apply(OrderEvent::CourierAssigned),
            Ok(OrderStatus::Shipped)
        );
        assert!(OrderStatus::AwaitingConfirmation
            .apply(OrderEvent::CourierAssigned)
            .is_err());
        assert!(OrderStatus::Shipped
            .apply(OrderEvent::CourierAssigned)
            .is_err());
    }

    #[test]
    fn arrival_completes_shipped_orders_only() {
        assert_eq!(
            OrderStatus::Shipped.apply(OrderEvent::DeliveryArrived),
            Ok(OrderStatus::Completed)
        );
        assert!(OrderStatus::Processing
            .apply(OrderEvent::DeliveryArrived)
            .is_err());
    }

    #[test]
    fn completed_is_terminal() {
        for event in [
            OrderEvent::Confirmed,
            OrderEvent::PaymentProofUploaded,
            OrderEvent::CourierAssigned,
            OrderEvent::DeliveryArrived,
        ] {
            assert!(OrderStatus::Completed.apply(event).is_err());
        }
    }

    #[test]
    fn only_processing_can_be_requested_directly() {
        assert_eq!(
            OrderStatus::direct_request_event(OrderStatus::Processing),
            Some(OrderEvent::Confirmed)
        );
        for target in [
            OrderStatus::AwaitingConfirmation,
            OrderStatus::AwaitingCourier,
            OrderStatus::Shipped,
            OrderStatus::Completed,
        ] {
            assert_eq!(OrderStatus::direct_request_event(target), None);
        }
    }

    #[test]
    fn no_event_leads_out_of_awaiting_courier() {
        // The status exists in the domain but is disconnected; no event
        // enters or leaves it.
        for event in [
            OrderEvent::Confirmed,
            OrderEvent::PaymentProofUploaded,
            OrderEvent::CourierAssigned,
            OrderEvent::DeliveryArrived,
        ] {
            assert!(OrderStatus::AwaitingCourier.apply(event).is_err());
        }
    }

    #[test]
    fn delivery_advances_in_transit_to_arrived() {
        assert_eq!(
            DeliveryStatus::InTransit.advance_to(DeliveryStatus::Arrived),
            Ok(DeliveryStatus::Arrived)
        );
    }

    #[test]
    fn delivery_reapplying_current_status_is_noop() {
        assert_eq!(
            DeliveryStatus::InTransit.advance_to(DeliveryStatus::InTransit),
            Ok(DeliveryStatus::InTransit)
        );
        assert_eq!(
            DeliveryStatus::Arrived.advance_to(DeliveryStatus::Arrived),
            Ok(DeliveryStatus::Arrived)
        );
    }

    #[test]
    fn delivery_cannot_regress_from_arrived() {
        assert!(DeliveryStatus::Arrived
            .advance_to(DeliveryStatus::InTransit)
            .is_err());
    }

    #[test]
    fn status_strings_round_trip() {
        for status in [
            OrderStatus::AwaitingConfirmation,
            OrderStatus::Processing,
            OrderStatus::AwaitingCourier,
            OrderStatus::Shipped,
            OrderStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        for status in [DeliveryStatus::InTransit, DeliveryStatus::Arrived] {
            assert_eq!(status.as_str().parse::<DeliveryStatus>(), Ok(status));
        }
    }

    #[test]
    fn unknown_status_string_is_rejected() {
        assert!("PENDING".parse::<OrderStatus>().is_err());
        assert!("DELIVERED".parse::<DeliveryStatus>().is_err());
    }
}
