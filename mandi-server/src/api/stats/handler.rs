//! Statistics API Handlers (owner dashboard)

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::models::Role;
use crate::db::repository::{CatalogItemRepository, UserRepository};
use crate::utils::AppResult;

/// Top seller row, ranked by summed catalog quantity
#[derive(Debug, Serialize)]
pub struct TopSeller {
    pub seller: String,
    pub total_quantity: i64,
}

/// Owner dashboard response
#[derive(Debug, Serialize)]
pub struct OwnerStats {
    pub total_products: i64,
    pub total_quantity: i64,
    pub total_sellers: i64,
    pub total_buyers: i64,
    pub top_sellers: Vec<TopSeller>,
}

/// GET /api/stats - aggregate rollup (Owner)
///
/// Ranks top sellers by summed quantity: the measure of actual supply on
/// the marketplace, not listing count.
pub async fn owner_stats(State(state): State<ServerState>) -> AppResult<Json<OwnerStats>> {
    let catalog = CatalogItemRepository::new(state.get_db());
    let users = UserRepository::new(state.get_db());

    let total_products = catalog.count_all().await?;
    let mut aggregates = catalog.aggregate_by_owner().await?;
    let total_quantity: i64 = aggregates.iter().map(|a| a.total_quantity).sum();

    let total_sellers = users.count_by_role(Role::Seller).await?;
    let total_buyers = users.count_by_role(Role::Buyer).await?;

    aggregates.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
    let mut top_sellers = Vec::new();
    for agg in aggregates.into_iter().take(3) {
        let username = users
            .find_by_id(&agg.owner.to_string())
            .await?
            .map(|u| u.username)
            .unwrap_or_else(|| agg.owner.to_string());
        top_sellers.push(TopSeller {
            seller: username,
            total_quantity: agg.total_quantity,
        });
    }

    Ok(Json(OwnerStats {
        total_products,
        total_quantity,
        total_sellers,
        total_buyers,
        top_sellers,
    }))
}
