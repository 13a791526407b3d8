//! Statistics API module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_role;
use crate::core::ServerState;
use crate::db::models::Role;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stats", stats_routes())
}

fn stats_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::owner_stats))
        .layer(middleware::from_fn(require_role(&[Role::Owner])))
}
