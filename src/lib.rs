pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::catalog::CatalogService;
use application::deliveries::DeliveryService;
use application::orders::OrderService;
use infrastructure::catalog_repo::DieselCatalogRepository;
use infrastructure::delivery_repo::DieselDeliveryRepository;
use infrastructure::order_repo::DieselOrderRepository;

pub use db::{create_pool, DbPool};

pub type Orders = OrderService<DieselOrderRepository>;
pub type Deliveries = DeliveryService<DieselDeliveryRepository>;
pub type Catalog = CatalogService<DieselCatalogRepository>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::create_order,
        handlers::orders::get_order,
        handlers::orders::list_orders,
        handlers::orders::set_order_status,
        handlers::orders::record_payment_proof,
        handlers::orders::assign_courier,
        handlers::deliveries::list_deliveries,
        handlers::deliveries::update_delivery,
        handlers::catalog::list_packages,
        handlers::catalog::get_package,
        handlers::catalog::create_package,
        handlers::catalog::update_package,
        handlers::catalog::list_payment_methods,
        handlers::catalog::list_couriers,
    ),
    tags(
        (name = "orders", description = "Order lifecycle"),
        (name = "deliveries", description = "Courier deliveries"),
        (name = "catalog", description = "Packages, payment methods, couriers"),
    )
)]
struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let orders = web::Data::new(OrderService::new(DieselOrderRepository::new(pool.clone())));
    let deliveries = web::Data::new(DeliveryService::new(DieselDeliveryRepository::new(
        pool.clone(),
    )));
    let catalog = web::Data::new(CatalogService::new(DieselCatalogRepository::new(pool)));

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(orders.clone())
            .app_data(deliveries.clone())
            .app_data(catalog.clone())
            .wrap(Logger::default())
            .service(
                web::scope("/orders")
                    .route("", web::post().to(handlers::orders::create_order))
                    .route("", web::get().to(handlers::orders::list_orders))
                    .route("/{id}", web::get().to(handlers::orders::get_order))
                    .route("/{id}/status", web::post().to(handlers::orders::set_order_status))
                    .route(
                        "/{id}/payment-proof",
                        web::post().to(handlers::orders::record_payment_proof),
                    )
                    .route("/{id}/courier", web::post().to(handlers::orders::assign_courier)),
            )
            .service(
                web::scope("/deliveries")
                    .route("", web::get().to(handlers::deliveries::list_deliveries))
                    .route("/{id}", web::patch().to(handlers::deliveries::update_delivery)),
            )
            .service(
                web::scope("/packages")
                    .route("", web::get().to(handlers::catalog::list_packages))
                    .route("", web::post().to(handlers::catalog::create_package))
                    .route("/{id}", web::get().to(handlers::catalog::get_package))
                    .route("/{id}", web::put().to(handlers::catalog::update_package)),
            )
            .route(
                "/payment-methods",
                web::get().to(handlers::catalog::list_payment_methods),
            )
            .route("/couriers", web::get().to(handlers::catalog::list_couriers))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
