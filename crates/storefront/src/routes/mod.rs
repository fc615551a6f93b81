//! HTTP route handlers for the mock storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /api/health               - Health check
//!
//! # Catalog
//! GET  /api/products             - Product listing (search, category, categories,
//!                                  materials, min, max, sort)
//! GET  /api/products/{id}        - Product detail
//! GET  /api/products/{id}/related - Same-category products
//! GET  /api/categories           - Category menu with counts
//!
//! # Orders
//! POST /api/orders               - Place an order
//! GET  /api/orders/{id}          - Order lookup
//!
//! # Forms
//! POST /api/contact              - Contact form
//! POST /api/newsletter           - Newsletter subscription
//! ```

pub mod contact;
pub mod newsletter;
pub mod orders;
pub mod products;

use axum::{
    Json, Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{AppError, MessageBody};
use crate::middleware;
use crate::state::AppState;

/// Message returned by the health check.
pub const HEALTH_MESSAGE: &str = "Satwa E-commerce API is running";

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/related", get(products::related))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create))
        .route("/{id}", get(orders::show))
}

/// Create all `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/products", product_routes())
        .route("/categories", get(products::categories))
        .nest("/orders", order_routes())
        .route("/contact", post(contact::submit))
        .route("/newsletter", post(newsletter::subscribe))
        .fallback(not_found)
}

/// Full application: `/api` routes with request IDs, tracing and CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .with_state(state)
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::make_span)
                .on_response(middleware::on_response),
        )
        .layer(CorsLayer::permissive())
}

/// Liveness health check endpoint.
async fn health() -> Json<MessageBody> {
    Json(MessageBody::new(HEALTH_MESSAGE))
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}
