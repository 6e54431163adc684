use uuid::Uuid;

use super::catalog::{
    CourierView, PackageCategory, PackageDraft, PackageKind, PackageView, PaymentMethodView,
};
use super::errors::DomainError;
use super::order::{DeliveryView, ListResult, OrderDraft, OrderView};
use super::status::{DeliveryStatus, OrderStatus};

/// Persistence port for orders and their lifecycle.
///
/// Cross-entity transitions (courier assignment, payment proof) live here
/// because they must run inside one storage transaction; the legality of
/// each transition is still decided by the pure functions in
/// [`super::status`].
pub trait OrderRepository: Send + Sync + 'static {
    /// Atomically persist the order header and all of its lines. Unit
    /// prices are read from the package catalog inside the transaction and
    /// snapshotted onto each line; the stored total is the sum of the line
    /// subtotals by construction.
    fn create(&self, draft: &OrderDraft, receipt_number: &str) -> Result<OrderView, DomainError>;

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;

    /// Newest first. `customer` restricts the listing to one customer's
    /// orders.
    fn list(
        &self,
        customer: Option<Uuid>,
        page: i64,
        limit: i64,
    ) -> Result<ListResult<OrderView>, DomainError>;

    /// Move the order towards `requested`. Requesting the current status is
    /// an idempotent no-op; an unreachable target or an illegal transition
    /// fails without writing.
    fn set_status(&self, order_id: Uuid, requested: OrderStatus) -> Result<OrderView, DomainError>;

    /// Store the payment-proof reference and, if the order is still
    /// awaiting confirmation, advance it to processing. Later statuses are
    /// left untouched (status never regresses).
    fn record_payment_proof(
        &self,
        order_id: Uuid,
        proof_ref: &str,
    ) -> Result<OrderView, DomainError>;

    /// Create an in-transit delivery for the order and mark the order
    /// shipped, in one transaction. Requires the order to be in processing
    /// and `courier_id` to reference a staff member with the courier role.
    fn assign_courier(&self, order_id: Uuid, courier_id: Uuid)
        -> Result<DeliveryView, DomainError>;
}

pub trait DeliveryRepository: Send + Sync + 'static {
    fn find_by_id(&self, id: Uuid) -> Result<Option<DeliveryView>, DomainError>;

    /// Newest first. `courier` restricts the listing to one courier's
    /// work queue.
    fn list(&self, courier: Option<Uuid>) -> Result<Vec<DeliveryView>, DomainError>;

    /// Advance the delivery and store the photo if given. Arrival also
    /// stamps `arrived_at` and completes the parent order, in the same
    /// transaction.
    fn update(
        &self,
        delivery_id: Uuid,
        requested: DeliveryStatus,
        photo: Option<&str>,
    ) -> Result<DeliveryView, DomainError>;
}

pub trait CatalogRepository: Send + Sync + 'static {
    fn list_packages(
        &self,
        kind: Option<PackageKind>,
        category: Option<PackageCategory>,
    ) -> Result<Vec<PackageView>, DomainError>;

    fn find_package(&self, id: Uuid) -> Result<Option<PackageView>, DomainError>;

    fn create_package(&self, draft: &PackageDraft) -> Result<PackageView, DomainError>;

    fn update_package(&self, id: Uuid, draft: &PackageDraft) -> Result<PackageView, DomainError>;

    fn list_payment_methods(&self) -> Result<Vec<PaymentMethodView>, DomainError>;

    fn list_couriers(&self) -> Result<Vec<CourierView>, DomainError>;
}
