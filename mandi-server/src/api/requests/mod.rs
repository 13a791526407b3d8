//! Product Request API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_role;
use crate::core::ServerState;
use crate::db::models::Role;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/requests", request_routes())
}

fn request_routes() -> Router<ServerState> {
    let buyer = Router::new()
        .route("/", post(handler::create))
        .route("/my-requests", get(handler::list_mine))
        .layer(middleware::from_fn(require_role(&[Role::Buyer])));

    let admin = Router::new()
        .route("/", get(handler::list_all))
        .route("/{id}/broadcast", post(handler::broadcast))
        .layer(middleware::from_fn(require_role(&[Role::Admin])));

    let seller = Router::new()
        .route("/notified", get(handler::list_notified))
        .layer(middleware::from_fn(require_role(&[Role::Seller])));

    Router::new().merge(buyer).merge(admin).merge(seller)
}
