//! Seller Offer Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::request::RequestStatus;

/// Seller offer ID type
pub type SellerOfferId = RecordId;

/// Offer lifecycle - acceptance of one offer rejects its pending siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

/// A seller's proposed fulfilment terms against a specific request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerOffer {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<SellerOfferId>,
    /// Record link to the offering seller
    #[serde(with = "serde_helpers::record_id")]
    pub seller: RecordId,
    /// Record link to the product request
    #[serde(with = "serde_helpers::record_id")]
    pub request: RecordId,
    pub quantity: i64,
    pub price: Decimal,
    #[serde(default)]
    pub message: Option<String>,
    pub location: String,
    #[serde(default)]
    pub image: Option<String>,
    pub status: OfferStatus,
    pub offered_at: DateTime<Utc>,
}

/// Submit offer payload (seller and request come from token and path)
#[derive(Debug, Clone, Deserialize)]
pub struct SellerOfferCreate {
    pub quantity: i64,
    pub price: Decimal,
    #[serde(default)]
    pub message: Option<String>,
    pub location: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Admin projection: offer plus the seller's username
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferWithSeller {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<SellerOfferId>,
    #[serde(with = "serde_helpers::record_id")]
    pub seller: RecordId,
    pub seller_username: Option<String>,
    #[serde(with = "serde_helpers::record_id")]
    pub request: RecordId,
    pub quantity: i64,
    pub price: Decimal,
    #[serde(default)]
    pub message: Option<String>,
    pub location: String,
    #[serde(default)]
    pub image: Option<String>,
    pub status: OfferStatus,
    pub offered_at: DateTime<Utc>,
}

/// Seller projection: own offer joined with its request's headline fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferWithRequest {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<SellerOfferId>,
    #[serde(with = "serde_helpers::record_id")]
    pub request: RecordId,
    pub quantity: i64,
    pub price: Decimal,
    #[serde(default)]
    pub message: Option<String>,
    pub location: String,
    pub status: OfferStatus,
    pub offered_at: DateTime<Utc>,
    pub request_product_name: Option<String>,
    pub request_description: Option<String>,
    pub request_status: Option<RequestStatus>,
}
