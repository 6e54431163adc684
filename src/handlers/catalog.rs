use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::actor::Actor;
use crate::domain::catalog::{
    CourierView, PackageCategory, PackageDraft, PackageKind, PackageView, PaymentMethodDetailView,
    PaymentMethodView,
};
use crate::errors::AppError;
use crate::Catalog;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PackageRequest {
    pub name: String,
    pub kind: PackageKind,
    pub category: PackageCategory,
    pub serving_capacity: i32,
    /// Price per unit in minor currency units.
    pub unit_price: i64,
    pub description: String,
}

impl From<PackageRequest> for PackageDraft {
    fn from(r: PackageRequest) -> Self {
        PackageDraft {
            name: r.name,
            kind: r.kind,
            category: r.category,
            serving_capacity: r.serving_capacity,
            unit_price: r.unit_price,
            description: r.description,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListPackagesParams {
    pub kind: Option<PackageKind>,
    pub category: Option<PackageCategory>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PackageResponse {
    pub id: Uuid,
    pub name: String,
    pub kind: PackageKind,
    pub category: PackageCategory,
    pub serving_capacity: i32,
    pub unit_price: i64,
    pub description: String,
    pub created_at: String,
}

impl From<PackageView> for PackageResponse {
    fn from(p: PackageView) -> Self {
        PackageResponse {
            id: p.id,
            name: p.name,
            kind: p.kind,
            category: p.category,
            serving_capacity: p.serving_capacity,
            unit_price: p.unit_price,
            description: p.description,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentMethodDetailResponse {
    pub id: Uuid,
    pub account_number: String,
    pub provider: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentMethodResponse {
    pub id: Uuid,
    pub name: String,
    pub details: Vec<PaymentMethodDetailResponse>,
}

impl From<PaymentMethodView> for PaymentMethodResponse {
    fn from(m: PaymentMethodView) -> Self {
        PaymentMethodResponse {
            id: m.id,
            name: m.name,
            details: m
                .details
                .into_iter()
                .map(|d: PaymentMethodDetailView| PaymentMethodDetailResponse {
                    id: d.id,
                    account_number: d.account_number,
                    provider: d.provider,
                    logo_url: d.logo_url,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourierResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<CourierView> for CourierResponse {
    fn from(c: CourierView) -> Self {
        CourierResponse {
            id: c.id,
            name: c.name,
            email: c.email,
        }
    }
}

/// GET /packages
///
/// Public menu browsing with optional kind/category filters.
#[utoipa::path(
    get,
    path = "/packages",
    params(
        ("kind" = Option<PackageKind>, Query, description = "Filter by package kind"),
        ("category" = Option<PackageCategory>, Query, description = "Filter by event category"),
    ),
    responses((status = 200, description = "List of packages", body = [PackageResponse])),
    tag = "catalog"
)]
pub async fn list_packages(
    svc: web::Data<Catalog>,
    query: web::Query<ListPackagesParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();

    let packages = web::block(move || svc.list_packages(params.kind, params.category))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<PackageResponse> = packages.into_iter().map(PackageResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /packages/{id}
#[utoipa::path(
    get,
    path = "/packages/{id}",
    params(("id" = Uuid, Path, description = "Package UUID")),
    responses(
        (status = 200, description = "Package found", body = PackageResponse),
        (status = 404, description = "Package not found"),
    ),
    tag = "catalog"
)]
pub async fn get_package(
    svc: web::Data<Catalog>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let package_id = path.into_inner();

    let package = web::block(move || svc.get_package(package_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(PackageResponse::from(package)))
}

/// POST /packages
#[utoipa::path(
    post,
    path = "/packages",
    request_body = PackageRequest,
    responses(
        (status = 201, description = "Package created", body = PackageResponse),
        (status = 400, description = "Invalid package data"),
        (status = 403, description = "Only admins and owners manage the catalog"),
    ),
    tag = "catalog"
)]
pub async fn create_package(
    svc: web::Data<Catalog>,
    actor: Actor,
    body: web::Json<PackageRequest>,
) -> Result<HttpResponse, AppError> {
    let draft = PackageDraft::from(body.into_inner());

    let package = web::block(move || svc.create_package(actor, draft))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(PackageResponse::from(package)))
}

/// PUT /packages/{id}
#[utoipa::path(
    put,
    path = "/packages/{id}",
    params(("id" = Uuid, Path, description = "Package UUID")),
    request_body = PackageRequest,
    responses(
        (status = 200, description = "Package updated", body = PackageResponse),
        (status = 404, description = "Package not found"),
    ),
    tag = "catalog"
)]
pub async fn update_package(
    svc: web::Data<Catalog>,
    actor: Actor,
    path: web::Path<Uuid>,
    body: web::Json<PackageRequest>,
) -> Result<HttpResponse, AppError> {
    let package_id = path.into_inner();
    let draft = PackageDraft::from(body.into_inner());

    let package = web::block(move || svc.update_package(actor, package_id, draft))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(PackageResponse::from(package)))
}

/// GET /payment-methods
///
/// Public: customers need the bank/e-wallet accounts to pay against.
#[utoipa::path(
    get,
    path = "/payment-methods",
    responses((status = 200, description = "Payment methods", body = [PaymentMethodResponse])),
    tag = "catalog"
)]
pub async fn list_payment_methods(svc: web::Data<Catalog>) -> Result<HttpResponse, AppError> {
    let methods = web::block(move || svc.list_payment_methods())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<PaymentMethodResponse> = methods
        .into_iter()
        .map(PaymentMethodResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /couriers
#[utoipa::path(
    get,
    path = "/couriers",
    responses(
        (status = 200, description = "Couriers available for assignment", body = [CourierResponse]),
        (status = 403, description = "Only admins and owners list couriers"),
    ),
    tag = "catalog"
)]
pub async fn list_couriers(
    svc: web::Data<Catalog>,
    actor: Actor,
) -> Result<HttpResponse, AppError> {
    let couriers = web::block(move || svc.list_couriers(actor))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<CourierResponse> = couriers.into_iter().map(CourierResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}
