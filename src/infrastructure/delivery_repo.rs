use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::DeliveryView;
use crate::domain::ports::DeliveryRepository;
use crate::domain::status::{DeliveryStatus, OrderEvent, OrderStatus};
use crate::schema::{deliveries, orders};

use super::models::DeliveryRow;

pub struct DieselDeliveryRepository {
    pool: DbPool,
}

impl DieselDeliveryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn parse_status(raw: &str) -> Result<DeliveryStatus, DomainError> {
    raw.parse()
        .map_err(|_| DomainError::Internal(format!("corrupt delivery status in storage: {raw}")))
}

fn to_view(row: DeliveryRow) -> Result<DeliveryView, DomainError> {
    let status = parse_status(&row.status)?;
    Ok(DeliveryView {
        id: row.id,
        order_id: row.order_id,
        courier_id: row.courier_id,
        status,
        dispatched_at: row.dispatched_at,
        arrived_at: row.arrived_at,
        arrival_photo: row.arrival_photo,
    })
}

fn load_delivery(conn: &mut PgConnection, id: Uuid) -> Result<Option<DeliveryView>, DomainError> {
    let row = deliveries::table
        .find(id)
        .select(DeliveryRow::as_select())
        .first(conn)
        .optional()?;
    row.map(to_view).transpose()
}

impl DeliveryRepository for DieselDeliveryRepository {
    fn find_by_id(&self, id: Uuid) -> Result<Option<DeliveryView>, DomainError> {
        let mut conn = self.pool.get()?;
        load_delivery(&mut conn, id)
    }

    fn list(&self, courier: Option<Uuid>) -> Result<Vec<DeliveryView>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = deliveries::table.into_boxed();
        if let Some(courier_id) = courier {
            query = query.filter(deliveries::courier_id.eq(courier_id));
        }
        let rows = query
            .order(deliveries::created_at.desc())
            .select(DeliveryRow::as_select())
            .load(&mut conn)?;

        rows.into_iter().map(to_view).collect()
    }

    fn update(
        &self,
        delivery_id: Uuid,
        requested: DeliveryStatus,
        photo: Option<&str>,
    ) -> Result<DeliveryView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = deliveries::table
                .find(delivery_id)
                .select(DeliveryRow::as_select())
                .first(conn)
                .optional()?
                .ok_or(DomainError::NotFound("delivery"))?;

            let current = parse_status(&row.status)?;
            let next = current.advance_to(requested)?;
            let just_arrived = current == DeliveryStatus::InTransit && next == DeliveryStatus::Arrived;

            diesel::update(deliveries::table.find(delivery_id))
                .set(deliveries::status.eq(next.as_str()))
                .execute(conn)?;

            if let Some(photo_ref) = photo {
                diesel::update(deliveries::table.find(delivery_id))
                    .set(deliveries::arrival_photo.eq(photo_ref))
                    .execute(conn)?;
            }

            if just_arrived {
                diesel::update(deliveries::table.find(delivery_id))
                    .set(deliveries::arrived_at.eq(diesel::dsl::now))
                    .execute(conn)?;

                // Arrival completes the parent order, in the same
                // transaction as the delivery update.
                let order_status: String = orders::table
                    .find(row.order_id)
                    .select(orders::status)
                    .first(conn)
                    .optional()?
                    .ok_or(DomainError::NotFound("order"))?;
                let completed = order_status
                    .parse::<OrderStatus>()
                    .map_err(|_| {
                        DomainError::Internal(format!(
                            "corrupt order status in storage: {order_status}"
                        ))
                    })?
                    .apply(OrderEvent::DeliveryArrived)?;
                diesel::update(orders::table.find(row.order_id))
                    .set((
                        orders::status.eq(completed.as_str()),
                        orders::updated_at.eq(diesel::dsl::now),
                    ))
                    .execute(conn)?;
            }

            load_delivery(conn, delivery_id)?.ok_or(DomainError::NotFound("delivery"))
        })
    }
}
