//! Application router
//!
//! Merges the per-resource routers and applies the middleware stack.

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

/// Build a router with all routes registered (no middleware)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(crate::api::auth::router())
        .merge(crate::api::health::router())
        .merge(crate::api::products::router())
        .merge(crate::api::requests::router())
        .merge(crate::api::offers::router())
        .merge(crate::api::purchase::router())
        .merge(crate::api::stats::router())
}

/// Build the fully configured application
///
/// `require_auth` is applied at router level; it skips the public routes
/// internally.
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
