use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::actor::Role;
use crate::domain::errors::DomainError;
use crate::domain::order::{DeliveryView, ListResult, OrderDraft, OrderLineView, OrderView};
use crate::domain::ports::OrderRepository;
use crate::domain::status::{DeliveryStatus, OrderEvent, OrderStatus};
use crate::schema::{deliveries, order_lines, orders, packages, staff};

use super::models::{NewDeliveryRow, NewOrderLineRow, NewOrderRow, OrderLineRow, OrderRow};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// A status column that fails to parse means the row was written outside
/// the application; surface it as an internal error rather than a panic.
fn parse_status(raw: &str) -> Result<OrderStatus, DomainError> {
    raw.parse()
        .map_err(|_| DomainError::Internal(format!("corrupt order status in storage: {raw}")))
}

fn to_view(order: OrderRow, lines: Vec<OrderLineRow>) -> Result<OrderView, DomainError> {
    let status = parse_status(&order.status)?;
    Ok(OrderView {
        id: order.id,
        customer_id: order.customer_id,
        payment_method_id: order.payment_method_id,
        receipt_number: order.receipt_number,
        delivery_date: order.delivery_date,
        status,
        total_amount: order.total_amount,
        payment_proof: order.payment_proof,
        created_at: order.created_at,
        lines: lines
            .into_iter()
            .map(|l| OrderLineView {
                id: l.id,
                package_id: l.package_id,
                quantity: l.quantity,
                unit_price: l.unit_price,
                subtotal: l.subtotal,
            })
            .collect(),
    })
}

fn load_order(conn: &mut PgConnection, id: Uuid) -> Result<Option<OrderView>, DomainError> {
    let order = orders::table
        .find(id)
        .select(OrderRow::as_select())
        .first(conn)
        .optional()?;

    let Some(order) = order else {
        return Ok(None);
    };

    let lines = order_lines::table
        .filter(order_lines::order_id.eq(order.id))
        .order(order_lines::created_at.asc())
        .select(OrderLineRow::as_select())
        .load(conn)?;

    to_view(order, lines).map(Some)
}

fn require_order(conn: &mut PgConnection, id: Uuid) -> Result<OrderRow, DomainError> {
    orders::table
        .find(id)
        .select(OrderRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(DomainError::NotFound("order"))
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, draft: &OrderDraft, receipt_number: &str) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let order_id = Uuid::new_v4();

            // Snapshot the catalog price of every line before any insert.
            // The stored total is the sum of the stored subtotals by
            // construction.
            let mut total: i64 = 0;
            let mut new_lines = Vec::with_capacity(draft.lines.len());
            for line in &draft.lines {
                let unit_price: i64 = packages::table
                    .find(line.package_id)
                    .select(packages::unit_price)
                    .first(conn)
                    .optional()?
                    .ok_or(DomainError::NotFound("package"))?;
                let subtotal = unit_price * i64::from(line.quantity);
                total += subtotal;
                new_lines.push(NewOrderLineRow {
                    id: Uuid::new_v4(),
                    order_id,
                    package_id: line.package_id,
                    quantity: line.quantity,
                    unit_price,
                    subtotal,
                });
            }

            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    customer_id: draft.customer_id,
                    payment_method_id: draft.payment_method_id,
                    receipt_number: receipt_number.to_string(),
                    delivery_date: draft.delivery_date,
                    status: OrderStatus::AwaitingConfirmation.as_str().to_string(),
                    total_amount: total,
                })
                .execute(conn)?;

            diesel::insert_into(order_lines::table)
                .values(&new_lines)
                .execute(conn)?;

            load_order(conn, order_id)?
                .ok_or_else(|| DomainError::Internal("created order vanished".to_string()))
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;
        load_order(&mut conn, id)
    }

    fn list(
        &self,
        customer: Option<Uuid>,
        page: i64,
        limit: i64,
    ) -> Result<ListResult<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = (page - 1) * limit;
        conn.transaction::<_, DomainError, _>(|conn| {
            let mut count_query = orders::table.into_boxed();
            let mut rows_query = orders::table.into_boxed();
            if let Some(customer_id) = customer {
                count_query = count_query.filter(orders::customer_id.eq(customer_id));
                rows_query = rows_query.filter(orders::customer_id.eq(customer_id));
            }

            let total: i64 = count_query.count().get_result(conn)?;

            let rows = rows_query
                .select(OrderRow::as_select())
                .order(orders::created_at.desc())
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            let mut items = Vec::with_capacity(rows.len());
            for row in rows {
                let lines = order_lines::table
                    .filter(order_lines::order_id.eq(row.id))
                    .order(order_lines::created_at.asc())
                    .select(OrderLineRow::as_select())
                    .load(conn)?;
                items.push(to_view(row, lines)?);
            }

            Ok(ListResult { items, total })
        })
    }

    fn set_status(&self, order_id: Uuid, requested: OrderStatus) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = require_order(conn, order_id)?;
            let current = parse_status(&row.status)?;

            // Re-requesting the current status is an idempotent no-op.
            if current != requested {
                let event = OrderStatus::direct_request_event(requested).ok_or_else(|| {
                    DomainError::Validation(format!(
                        "status {requested} cannot be requested directly"
                    ))
                })?;
                let next = current.apply(event)?;
                diesel::update(orders::table.find(order_id))
                    .set((
                        orders::status.eq(next.as_str()),
                        orders::updated_at.eq(diesel::dsl::now),
                    ))
                    .execute(conn)?;
            }

            load_order(conn, order_id)?.ok_or(DomainError::NotFound("order"))
        })
    }

    fn record_payment_proof(
        &self,
        order_id: Uuid,
        proof_ref: &str,
    ) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = require_order(conn, order_id)?;
            let current = parse_status(&row.status)?;

            // Proof uploads only push an awaiting order into processing;
            // orders already further along keep their status.
            let next = current
                .apply(OrderEvent::PaymentProofUploaded)
                .unwrap_or(current);

            diesel::update(orders::table.find(order_id))
                .set((
                    orders::payment_proof.eq(proof_ref),
                    orders::status.eq(next.as_str()),
                    orders::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)?;

            load_order(conn, order_id)?.ok_or(DomainError::NotFound("order"))
        })
    }

    fn assign_courier(
        &self,
        order_id: Uuid,
        courier_id: Uuid,
    ) -> Result<DeliveryView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = require_order(conn, order_id)?;
            let current = parse_status(&row.status)?;
            let next = current.apply(OrderEvent::CourierAssigned)?;

            let courier_role: String = staff::table
                .find(courier_id)
                .select(staff::role)
                .first(conn)
                .optional()?
                .ok_or(DomainError::NotFound("courier"))?;
            if courier_role != Role::Courier.as_str() {
                return Err(DomainError::Validation(format!(
                    "staff member {courier_id} is not a courier"
                )));
            }

            let delivery = NewDeliveryRow {
                id: Uuid::new_v4(),
                order_id,
                courier_id,
                status: DeliveryStatus::InTransit.as_str().to_string(),
                dispatched_at: Utc::now(),
            };
            diesel::insert_into(deliveries::table)
                .values(&delivery)
                .execute(conn)?;

            diesel::update(orders::table.find(order_id))
                .set((
                    orders::status.eq(next.as_str()),
                    orders::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)?;

            Ok(DeliveryView {
                id: delivery.id,
                order_id,
                courier_id,
                status: DeliveryStatus::InTransit,
                dispatched_at: delivery.dispatched_at,
                arrived_at: None,
                arrival_photo: None,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Utc};
    use diesel::prelude::*;
    use uuid::Uuid;

    use super::DieselOrderRepository;
    use crate::domain::order::{generate_receipt_number, OrderDraft, OrderLineDraft};
    use crate::domain::ports::OrderRepository;
    use crate::domain::status::{DeliveryStatus, OrderStatus};
    use crate::infrastructure::testsupport::{setup_db, Fixture};
    use crate::schema::{deliveries, order_lines, orders};

    fn draft(fixture: &Fixture, lines: Vec<OrderLineDraft>) -> OrderDraft {
        OrderDraft {
            customer_id: fixture.customer_id,
            payment_method_id: fixture.payment_method_id,
            delivery_date: Utc::now().date_naive(),
            lines,
        }
    }

    #[tokio::test]
    async fn create_snapshots_catalog_prices_and_totals() {
        let (_container, pool) = setup_db().await;
        let fixture = Fixture::seed(&pool);
        let repo = DieselOrderRepository::new(pool);

        // box menu at 30_000, quantity 2
        let order = repo
            .create(
                &draft(
                    &fixture,
                    vec![OrderLineDraft {
                        package_id: fixture.box_package_id,
                        quantity: 2,
                    }],
                ),
                &generate_receipt_number(Utc::now()),
            )
            .expect("create failed");

        assert_eq!(order.status, OrderStatus::AwaitingConfirmation);
        assert_eq!(order.payment_proof, None);
        assert_eq!(order.total_amount, 60_000);
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].unit_price, 30_000);
        assert_eq!(order.lines[0].subtotal, 60_000);
    }

    #[tokio::test]
    async fn create_total_equals_sum_of_line_subtotals() {
        let (_container, pool) = setup_db().await;
        let fixture = Fixture::seed(&pool);
        let repo = DieselOrderRepository::new(pool);

        let order = repo
            .create(
                &draft(
                    &fixture,
                    vec![
                        OrderLineDraft {
                            package_id: fixture.box_package_id,
                            quantity: 3,
                        },
                        OrderLineDraft {
                            package_id: fixture.buffet_package_id,
                            quantity: 1,
                        },
                    ],
                ),
                &generate_receipt_number(Utc::now()),
            )
            .expect("create failed");

        assert_eq!(order.lines.len(), 2);
        let sum: i64 = order.lines.iter().map(|l| l.subtotal).sum();
        assert_eq!(order.total_amount, sum);
    }

    #[tokio::test]
    async fn create_with_unknown_package_rolls_back_entirely() {
        let (_container, pool) = setup_db().await;
        let fixture = Fixture::seed(&pool);
        let repo = DieselOrderRepository::new(pool.clone());

        let result = repo.create(
            &draft(
                &fixture,
                vec![
                    OrderLineDraft {
                        package_id: fixture.box_package_id,
                        quantity: 1,
                    },
                    OrderLineDraft {
                        package_id: Uuid::new_v4(),
                        quantity: 1,
                    },
                ],
            ),
            &generate_receipt_number(Utc::now()),
        );
        assert!(result.is_err());

        let mut conn = pool.get().expect("connection");
        let order_count: i64 = orders::table.count().get_result(&mut conn).expect("count");
        let line_count: i64 = order_lines::table
            .count()
            .get_result(&mut conn)
            .expect("count");
        assert_eq!(order_count, 0, "no partial order row");
        assert_eq!(line_count, 0, "no partial line rows");
    }

    #[tokio::test]
    async fn receipt_number_embeds_todays_date() {
        let (_container, pool) = setup_db().await;
        let fixture = Fixture::seed(&pool);
        let repo = DieselOrderRepository::new(pool);

        let order = repo
            .create(
                &draft(
                    &fixture,
                    vec![OrderLineDraft {
                        package_id: fixture.box_package_id,
                        quantity: 1,
                    }],
                ),
                &generate_receipt_number(Utc::now()),
            )
            .expect("create failed");

        let today = Utc::now();
        let expected_date = format!(
            "{:02}{:02}{:02}",
            today.year() % 100,
            today.month(),
            today.day()
        );
        let parts: Vec<&str> = order.receipt_number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "CTR");
        assert_eq!(parts[1], expected_date);
        assert_eq!(parts[2].len(), 6);
    }

    #[tokio::test]
    async fn confirming_twice_is_an_idempotent_noop() {
        let (_container, pool) = setup_db().await;
        let fixture = Fixture::seed(&pool);
        let repo = DieselOrderRepository::new(pool);

        let order = fixture.place_order(&repo, 1);

        let once = repo
            .set_status(order.id, OrderStatus::Processing)
            .expect("first confirm");
        assert_eq!(once.status, OrderStatus::Processing);

        let twice = repo
            .set_status(order.id, OrderStatus::Processing)
            .expect("second confirm should be a no-op");
        assert_eq!(twice.status, OrderStatus::Processing);
    }

    #[tokio::test]
    async fn awaiting_courier_cannot_be_requested() {
        let (_container, pool) = setup_db().await;
        let fixture = Fixture::seed(&pool);
        let repo = DieselOrderRepository::new(pool);

        let order = fixture.place_order(&repo, 1);
        let result = repo.set_status(order.id, OrderStatus::AwaitingCourier);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn shipped_cannot_be_requested_directly() {
        let (_container, pool) = setup_db().await;
        let fixture = Fixture::seed(&pool);
        let repo = DieselOrderRepository::new(pool);

        let order = fixture.place_order(&repo, 1);
        assert!(repo.set_status(order.id, OrderStatus::Shipped).is_err());
    }

    #[tokio::test]
    async fn payment_proof_advances_awaiting_orders() {
        let (_container, pool) = setup_db().await;
        let fixture = Fixture::seed(&pool);
        let repo = DieselOrderRepository::new(pool);

        let order = fixture.place_order(&repo, 1);
        let updated = repo
            .record_payment_proof(order.id, "proof.jpg")
            .expect("record proof");

        assert_eq!(updated.status, OrderStatus::Processing);
        assert_eq!(updated.payment_proof.as_deref(), Some("proof.jpg"));
    }

    #[tokio::test]
    async fn payment_proof_does_not_regress_completed_orders() {
        let (_container, pool) = setup_db().await;
        let fixture = Fixture::seed(&pool);
        let repo = DieselOrderRepository::new(pool.clone());

        let order = fixture.complete_order(&repo, &pool);
        let updated = repo
            .record_payment_proof(order.id, "late-proof.jpg")
            .expect("record proof");

        assert_eq!(updated.status, OrderStatus::Completed);
        assert_eq!(updated.payment_proof.as_deref(), Some("late-proof.jpg"));
    }

    #[tokio::test]
    async fn assign_courier_ships_order_and_creates_delivery() {
        let (_container, pool) = setup_db().await;
        let fixture = Fixture::seed(&pool);
        let repo = DieselOrderRepository::new(pool);

        let order = fixture.place_order(&repo, 1);
        repo.set_status(order.id, OrderStatus::Processing)
            .expect("confirm");

        let delivery = repo
            .assign_courier(order.id, fixture.courier_id)
            .expect("assign failed");

        assert_eq!(delivery.order_id, order.id);
        assert_eq!(delivery.courier_id, fixture.courier_id);
        assert_eq!(delivery.status, DeliveryStatus::InTransit);
        assert!(delivery.arrived_at.is_none());

        let shipped = repo
            .find_by_id(order.id)
            .expect("find")
            .expect("order exists");
        assert_eq!(shipped.status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn assign_courier_requires_processing_status() {
        let (_container, pool) = setup_db().await;
        let fixture = Fixture::seed(&pool);
        let repo = DieselOrderRepository::new(pool.clone());

        let order = fixture.place_order(&repo, 1);
        // still awaiting confirmation
        let result = repo.assign_courier(order.id, fixture.courier_id);
        assert!(result.is_err());

        let mut conn = pool.get().expect("connection");
        let delivery_count: i64 = deliveries::table
            .count()
            .get_result(&mut conn)
            .expect("count");
        assert_eq!(delivery_count, 0, "failed assignment leaves no delivery");
    }

    #[tokio::test]
    async fn assign_courier_rejects_non_courier_staff() {
        let (_container, pool) = setup_db().await;
        let fixture = Fixture::seed(&pool);
        let repo = DieselOrderRepository::new(pool);

        let order = fixture.place_order(&repo, 1);
        repo.set_status(order.id, OrderStatus::Processing)
            .expect("confirm");

        assert!(repo.assign_courier(order.id, fixture.admin_id).is_err());
        assert!(repo.assign_courier(order.id, Uuid::new_v4()).is_err());
    }

    #[tokio::test]
    async fn list_filters_by_customer_and_paginates() {
        let (_container, pool) = setup_db().await;
        let fixture = Fixture::seed(&pool);
        let repo = DieselOrderRepository::new(pool.clone());

        for _ in 0..5 {
            fixture.place_order(&repo, 1);
        }
        let other_customer = fixture.seed_second_customer(&pool);
        repo.create(
            &OrderDraft {
                customer_id: other_customer,
                payment_method_id: fixture.payment_method_id,
                delivery_date: Utc::now().date_naive(),
                lines: vec![OrderLineDraft {
                    package_id: fixture.box_package_id,
                    quantity: 1,
                }],
            },
            &generate_receipt_number(Utc::now()),
        )
        .expect("create for second customer");

        let all = repo.list(None, 1, 20).expect("list all");
        assert_eq!(all.total, 6);

        let page1 = repo.list(Some(fixture.customer_id), 1, 3).expect("page 1");
        assert_eq!(page1.total, 5);
        assert_eq!(page1.items.len(), 3);

        let page2 = repo.list(Some(fixture.customer_id), 2, 3).expect("page 2");
        assert_eq!(page2.items.len(), 2);

        let theirs = repo.list(Some(other_customer), 1, 20).expect("list other");
        assert_eq!(theirs.total, 1);
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_unknown_id() {
        let (_container, pool) = setup_db().await;
        let _fixture = Fixture::seed(&pool);
        let repo = DieselOrderRepository::new(pool);

        let result = repo
            .find_by_id(Uuid::new_v4())
            .expect("find should not error");
        assert!(result.is_none());
    }
}
