//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`              - Short link redirect
//! - `GET  /health`              - Health check: store, cache, enrichment queue
//! - `POST /api/shorten`         - Create a short link
//! - `GET  /api/qrcode/{code}`   - QR code image
//!
//! Authentication is handled in front of this service; an authenticated
//! caller arrives as an [`crate::api::middleware::OwnerId`] extension.

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer())
}
