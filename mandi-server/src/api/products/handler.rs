//! Product Catalog API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{CatalogItem, CatalogItemCreate, CatalogItemUpdate, Role};
use crate::db::repository::{CatalogItemRepository, UserRepository};
use crate::utils::validation::{
    MAX_IMAGE_REF_LEN, MAX_LOCATION_LEN, MAX_NAME_LEN, validate_optional_text,
    validate_positive_price, validate_positive_quantity, validate_required_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};

fn caller_record_id(user: &CurrentUser) -> AppResult<RecordId> {
    user.id
        .parse()
        .map_err(|_| AppError::invalid_token("Malformed user id in token"))
}

/// Admin may act on any row; a seller only on rows they own
fn ensure_can_modify(user: &CurrentUser, item: &CatalogItem) -> AppResult<()> {
    if user.role == Role::Admin {
        return Ok(());
    }
    let caller = caller_record_id(user)?;
    if user.role == Role::Seller && item.owner == caller {
        return Ok(());
    }
    Err(AppError::forbidden(
        "You may only modify your own products",
    ))
}

/// POST /api/products - create a catalog item (Seller)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CatalogItemCreate>,
) -> AppResult<Json<AppResponse<CatalogItem>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_positive_price(payload.price, "price")?;
    if payload.quantity < 0 {
        return Err(AppError::validation("quantity must not be negative"));
    }
    validate_required_text(&payload.location, "location", MAX_LOCATION_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_IMAGE_REF_LEN)?;

    let owner = caller_record_id(&user)?;
    let repo = CatalogItemRepository::new(state.get_db());
    let item = repo.create(payload, owner).await?;

    Ok(ok_with_message(item, "Product created"))
}

/// GET /api/products - role-filtered list
///
/// Sellers see only their own rows; Admin, Buyer, and Owner see all.
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<CatalogItem>>> {
    let repo = CatalogItemRepository::new(state.get_db());

    let items = match user.role {
        Role::Seller => repo.find_by_owner(caller_record_id(&user)?).await?,
        Role::Admin | Role::Buyer | Role::Owner => repo.find_all().await?,
    };

    Ok(Json(items))
}

/// PUT /api/products/{id} - update (Admin, or owning Seller)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<CatalogItemUpdate>,
) -> AppResult<Json<AppResponse<CatalogItem>>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(price) = payload.price {
        validate_positive_price(price, "price")?;
    }
    if let Some(quantity) = payload.quantity
        && quantity < 0
    {
        return Err(AppError::validation("quantity must not be negative"));
    }
    validate_optional_text(&payload.location, "location", MAX_LOCATION_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_IMAGE_REF_LEN)?;

    let repo = CatalogItemRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))?;

    ensure_can_modify(&user, &existing)?;

    let updated = repo.update(&id, payload).await?;
    Ok(ok_with_message(updated, "Product updated successfully"))
}

/// DELETE /api/products/{id} - delete (Admin, or owning Seller)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let repo = CatalogItemRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))?;

    ensure_can_modify(&user, &existing)?;

    repo.delete(&id).await?;
    Ok(ok_with_message((), "Product deleted successfully"))
}

// ── Owner statistics ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TopSellerByListings {
    pub seller: String,
    pub listings: i64,
}

#[derive(Debug, Serialize)]
pub struct OwnerProductStats {
    pub total_products: i64,
    pub total_quantity: i64,
    pub total_sellers: i64,
    pub total_buyers: i64,
    pub top_sellers: Vec<TopSellerByListings>,
}

/// GET /api/products/stats/owner - product-centric rollup (Owner)
///
/// Top sellers here rank by listing count; the owner dashboard under
/// `/api/stats` ranks by summed quantity.
pub async fn owner_stats(
    State(state): State<ServerState>,
) -> AppResult<Json<OwnerProductStats>> {
    let catalog = CatalogItemRepository::new(state.get_db());
    let users = UserRepository::new(state.get_db());

    let total_products = catalog.count_all().await?;
    let mut aggregates = catalog.aggregate_by_owner().await?;
    let total_quantity: i64 = aggregates.iter().map(|a| a.total_quantity).sum();

    let total_sellers = users.count_by_role(Role::Seller).await?;
    let total_buyers = users.count_by_role(Role::Buyer).await?;

    aggregates.sort_by(|a, b| b.listings.cmp(&a.listings));
    let mut top_sellers = Vec::new();
    for agg in aggregates.into_iter().take(3) {
        let username = users
            .find_by_id(&agg.owner.to_string())
            .await?
            .map(|u| u.username)
            .unwrap_or_else(|| agg.owner.to_string());
        top_sellers.push(TopSellerByListings {
            seller: username,
            listings: agg.listings,
        });
    }

    Ok(Json(OwnerProductStats {
        total_products,
        total_quantity,
        total_sellers,
        total_buyers,
        top_sellers,
    }))
}
