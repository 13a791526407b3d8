//! Seller Offer API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_role;
use crate::core::ServerState;
use crate::db::models::Role;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/offers", offer_routes())
}

fn offer_routes() -> Router<ServerState> {
    let seller = Router::new()
        .route("/{id}", post(handler::submit))
        .route("/seller/my-offers", get(handler::my_offer_request_ids))
        .route("/seller", get(handler::my_offers))
        .layer(middleware::from_fn(require_role(&[Role::Seller])));

    let admin = Router::new()
        .route("/request/{id}", get(handler::list_for_request))
        .route("/{id}/accept", post(handler::accept))
        .layer(middleware::from_fn(require_role(&[Role::Admin])));

    Router::new().merge(seller).merge(admin)
}
