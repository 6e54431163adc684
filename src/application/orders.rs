use chrono::Utc;
use uuid::Uuid;

use crate::domain::actor::{Actor, Role};
use crate::domain::errors::DomainError;
use crate::domain::order::{generate_receipt_number, ListResult, OrderDraft, OrderView};
use crate::domain::ports::OrderRepository;
use crate::domain::status::OrderStatus;

/// Order use cases: input validation and authorization happen here, before
/// anything touches storage; transition legality and atomicity live behind
/// the repository port.
pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_order(&self, actor: Actor, draft: OrderDraft) -> Result<OrderView, DomainError> {
        if draft.lines.is_empty() {
            return Err(DomainError::Validation(
                "an order needs at least one line".to_string(),
            ));
        }
        if let Some(line) = draft.lines.iter().find(|l| l.quantity < 1) {
            return Err(DomainError::Validation(format!(
                "quantity must be at least 1 for package {}",
                line.package_id
            )));
        }
        match actor.role {
            Role::Customer if actor.id != draft.customer_id => {
                return Err(DomainError::Forbidden(
                    "customers can only place orders for themselves".to_string(),
                ));
            }
            Role::Courier => {
                return Err(DomainError::Forbidden(
                    "couriers cannot place orders".to_string(),
                ));
            }
            _ => {}
        }

        let receipt_number = generate_receipt_number(Utc::now());
        self.repo.create(&draft, &receipt_number)
    }

    pub fn get_order(&self, actor: Actor, id: Uuid) -> Result<OrderView, DomainError> {
        let order = self
            .repo
            .find_by_id(id)?
            .ok_or(DomainError::NotFound("order"))?;
        if actor.role == Role::Customer && order.customer_id != actor.id {
            return Err(DomainError::Forbidden(
                "customers can only view their own orders".to_string(),
            ));
        }
        Ok(order)
    }

    pub fn list_orders(
        &self,
        actor: Actor,
        page: i64,
        limit: i64,
    ) -> Result<ListResult<OrderView>, DomainError> {
        match actor.role {
            Role::Admin | Role::Owner => self.repo.list(None, page, limit),
            Role::Customer => self.repo.list(Some(actor.id), page, limit),
            Role::Courier => Err(DomainError::Forbidden(
                "couriers track their work through deliveries".to_string(),
            )),
        }
    }

    pub fn set_order_status(
        &self,
        actor: Actor,
        order_id: Uuid,
        requested: OrderStatus,
    ) -> Result<OrderView, DomainError> {
        actor.require_back_office("updating order status")?;
        self.repo.set_status(order_id, requested)
    }

    pub fn record_payment_proof(
        &self,
        actor: Actor,
        order_id: Uuid,
        proof_ref: &str,
    ) -> Result<OrderView, DomainError> {
        if proof_ref.trim().is_empty() {
            return Err(DomainError::Validation(
                "payment proof reference must not be empty".to_string(),
            ));
        }
        match actor.role {
            Role::Courier => {
                return Err(DomainError::Forbidden(
                    "couriers cannot upload payment proof".to_string(),
                ));
            }
            Role::Customer => {
                let order = self
                    .repo
                    .find_by_id(order_id)?
                    .ok_or(DomainError::NotFound("order"))?;
                if order.customer_id != actor.id {
                    return Err(DomainError::Forbidden(
                        "customers can only upload proof for their own orders".to_string(),
                    ));
                }
            }
            Role::Admin | Role::Owner => {}
        }
        self.repo.record_payment_proof(order_id, proof_ref)
    }

    pub fn assign_courier(
        &self,
        actor: Actor,
        order_id: Uuid,
        courier_id: Uuid,
    ) -> Result<crate::domain::order::DeliveryView, DomainError> {
        actor.require_back_office("assigning a courier")?;
        self.repo.assign_courier(order_id, courier_id)
    }
}
