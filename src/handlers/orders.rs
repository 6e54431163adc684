use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::actor::Actor;
use crate::domain::order::{OrderDraft, OrderLineDraft, OrderLineView, OrderView};
use crate::domain::status::OrderStatus;
use crate::errors::AppError;
use crate::Orders;

use super::deliveries::DeliveryResponse;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderLineRequest {
    pub package_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub payment_method_id: Uuid,
    /// Requested delivery date, e.g. "2025-03-07".
    pub delivery_date: NaiveDate,
    pub lines: Vec<CreateOrderLineRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentProofRequest {
    /// URL of the uploaded transfer receipt; the image itself is hosted
    /// elsewhere.
    pub proof_url: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignCourierRequest {
    pub courier_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: Uuid,
    pub package_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub subtotal: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub payment_method_id: Uuid,
    pub receipt_number: String,
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
    pub total_amount: i64,
    pub payment_proof: Option<String>,
    pub created_at: String,
    pub lines: Vec<OrderLineResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(order: OrderView) -> Self {
        OrderResponse {
            id: order.id,
            customer_id: order.customer_id,
            payment_method_id: order.payment_method_id,
            receipt_number: order.receipt_number,
            delivery_date: order.delivery_date,
            status: order.status,
            total_amount: order.total_amount,
            payment_proof: order.payment_proof,
            created_at: order.created_at.to_rfc3339(),
            lines: order.lines.into_iter().map(OrderLineResponse::from).collect(),
        }
    }
}

impl From<OrderLineView> for OrderLineResponse {
    fn from(line: OrderLineView) -> Self {
        OrderLineResponse {
            id: line.id,
            package_id: line.package_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
            subtotal: line.subtotal,
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Creates an order with its lines in one database transaction. Prices are
/// read from the package catalog, never from the request.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Empty cart or invalid quantity"),
        (status = 403, description = "Actor may not order for this customer"),
        (status = 404, description = "Referenced package not found"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    svc: web::Data<Orders>,
    actor: Actor,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let draft = OrderDraft {
        customer_id: body.customer_id,
        payment_method_id: body.payment_method_id,
        delivery_date: body.delivery_date,
        lines: body
            .lines
            .into_iter()
            .map(|l| OrderLineDraft {
                package_id: l.package_id,
                quantity: l.quantity,
            })
            .collect(),
    };

    let order = web::block(move || svc.create_order(actor, draft))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    svc: web::Data<Orders>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || svc.get_order(actor, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /orders
///
/// Staff see every order; customers see only their own.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    svc: web::Data<Orders>,
    actor: Actor,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let result = web::block(move || svc.list_orders(actor, page, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(OrderResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// POST /orders/{id}/status
///
/// Staff confirmation. Requesting the current status is a no-op; statuses
/// that only compound operations can reach are rejected.
#[utoipa::path(
    post,
    path = "/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = OrderResponse),
        (status = 400, description = "Status cannot be requested directly"),
        (status = 409, description = "Illegal transition from the current status"),
    ),
    tag = "orders"
)]
pub async fn set_order_status(
    svc: web::Data<Orders>,
    actor: Actor,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let requested = body.into_inner().status;

    let order = web::block(move || svc.set_order_status(actor, order_id, requested))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// POST /orders/{id}/payment-proof
///
/// Stores the proof reference and opportunistically advances an awaiting
/// order into processing.
#[utoipa::path(
    post,
    path = "/orders/{id}/payment-proof",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = PaymentProofRequest,
    responses(
        (status = 200, description = "Payment proof recorded", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn record_payment_proof(
    svc: web::Data<Orders>,
    actor: Actor,
    path: web::Path<Uuid>,
    body: web::Json<PaymentProofRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let proof_url = body.into_inner().proof_url;

    let order = web::block(move || svc.record_payment_proof(actor, order_id, &proof_url))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// POST /orders/{id}/courier
///
/// Creates the delivery and ships the order in one transaction.
#[utoipa::path(
    post,
    path = "/orders/{id}/courier",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = AssignCourierRequest,
    responses(
        (status = 201, description = "Courier assigned", body = DeliveryResponse),
        (status = 404, description = "Order or courier not found"),
        (status = 409, description = "Order is not in processing"),
    ),
    tag = "orders"
)]
pub async fn assign_courier(
    svc: web::Data<Orders>,
    actor: Actor,
    path: web::Path<Uuid>,
    body: web::Json<AssignCourierRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let courier_id = body.into_inner().courier_id;

    let delivery = web::block(move || svc.assign_courier(actor, order_id, courier_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(DeliveryResponse::from(delivery)))
}
