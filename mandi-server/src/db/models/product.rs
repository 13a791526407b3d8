//! Catalog Item Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Catalog item ID type
pub type CatalogItemId = RecordId;

/// Purchasable inventory item, visible to buyers
///
/// Created directly by a seller, or synthesized by the workflow when an
/// offer is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CatalogItemId>,
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
    pub location: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Record link to the seller who owns this item
    #[serde(with = "serde_helpers::record_id")]
    pub owner: RecordId,
    pub created_at: DateTime<Utc>,
}

/// Create catalog item payload (owner comes from the caller's token)
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogItemCreate {
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
    pub location: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Update catalog item payload, merged field-by-field into the stored row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
