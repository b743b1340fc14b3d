//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`          - Health check: database (public)
//! - `/api/v1/auth/*`        - Signup and token exchange (rate limited per IP)
//! - `/api/v1/*`             - Catalog, reviews, comments and accounts
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on the auth endpoints
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Per-IP limits for the auth endpoints.
#[derive(Debug, Clone, Copy)]
pub struct AuthRateLimit {
    pub per_second: u64,
    pub burst: u32,
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `limit` - token bucket for `/api/v1/auth/*`; the server must provide
///   peer addresses via `into_make_service_with_connect_info`
pub fn app_router(state: AppState, limit: AuthRateLimit) -> NormalizePath<Router> {
    let api_router = api::routes::auth_routes()
        .layer(rate_limit::auth_layer(limit.per_second, limit.burst))
        .merge(api::routes::resource_routes());

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
