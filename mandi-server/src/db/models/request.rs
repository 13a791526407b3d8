//! Product Request Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Product request ID type
pub type ProductRequestId = RecordId;

/// Buyer urgency hint, informational only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
}

/// Request lifecycle - only ever advances, never moves backward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Notified,
    Fulfilled,
}

/// Buyer-initiated demand record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRequest {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProductRequestId>,
    /// Record link to the requesting buyer
    #[serde(with = "serde_helpers::record_id")]
    pub buyer: RecordId,
    pub product_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: i64,
    pub urgency: Urgency,
    pub status: RequestStatus,
    /// Set exactly once, in the same transition that fulfils the request
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub accepted_offer: Option<RecordId>,
    pub created_at: DateTime<Utc>,
}

/// Create request payload
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRequestCreate {
    pub product_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: i64,
    #[serde(default)]
    pub urgency: Urgency,
}

/// Admin projection: request plus the buyer's username
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestWithBuyer {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProductRequestId>,
    #[serde(with = "serde_helpers::record_id")]
    pub buyer: RecordId,
    pub buyer_username: Option<String>,
    pub product_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: i64,
    pub urgency: Urgency,
    pub status: RequestStatus,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub accepted_offer: Option<RecordId>,
    pub created_at: DateTime<Utc>,
}

/// Buyer projection: own request joined with the accepted offer, when present
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestWithAcceptedOffer {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProductRequestId>,
    pub product_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: i64,
    pub urgency: Urgency,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub accepted_offer: Option<RecordId>,
    pub accepted_price: Option<rust_decimal::Decimal>,
    pub accepted_quantity: Option<i64>,
    pub accepted_location: Option<String>,
    pub accepted_seller: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgency_defaults_to_medium() {
        let payload: ProductRequestCreate =
            serde_json::from_str(r#"{"product_name":"Rice","quantity":50}"#).unwrap();
        assert_eq!(payload.urgency, Urgency::Medium);
        assert!(payload.description.is_none());
    }

    #[test]
    fn status_serializes_as_plain_string() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::Notified).unwrap(),
            "\"Notified\""
        );
    }
}
