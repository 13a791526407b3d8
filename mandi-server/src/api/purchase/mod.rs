//! Purchase API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_role;
use crate::core::ServerState;
use crate::db::models::Role;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/purchase", purchase_routes())
}

fn purchase_routes() -> Router<ServerState> {
    let buyer = Router::new()
        .route("/", post(handler::purchase))
        .route("/my-orders", get(handler::my_orders))
        .layer(middleware::from_fn(require_role(&[Role::Buyer])));

    // Invoice stays readable by any authenticated role
    Router::new()
        .route("/invoice/{id}", get(handler::invoice))
        .merge(buyer)
}
