//! Product Catalog API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_role;
use crate::core::ServerState;
use crate::db::models::Role;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", product_routes())
}

fn product_routes() -> Router<ServerState> {
    // Only sellers create; filtering of reads happens in the handler
    let create = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_role(&[Role::Seller])));

    // Admin may modify any row, sellers only their own (checked in handler)
    let modify = Router::new()
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_role(&[Role::Admin, Role::Seller])));

    let stats = Router::new()
        .route("/stats/owner", get(handler::owner_stats))
        .layer(middleware::from_fn(require_role(&[Role::Owner])));

    Router::new()
        .route("/", get(handler::list))
        .merge(create)
        .merge(modify)
        .merge(stats)
}
