//! Purchase Order Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order ID type
pub type OrderId = RecordId;

/// One invoice line, captured at purchase time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i64,
    pub line_total: Decimal,
}

/// Invoice snapshot embedded in the order
///
/// Decoupled from later catalog mutation: the invoice reflects the item as
/// it was when the purchase happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub generated_at: DateTime<Utc>,
    pub items: Vec<InvoiceLine>,
    pub total_amount: Decimal,
}

/// Immutable purchase record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    /// Record link to the purchased catalog item
    #[serde(with = "serde_helpers::record_id")]
    pub item: RecordId,
    /// Buyer username snapshot from the token
    pub buyer: String,
    pub quantity_purchased: i64,
    pub delivery_address: String,
    pub total_price: Decimal,
    pub invoice: Invoice,
    pub purchased_at: DateTime<Utc>,
}

/// Purchase payload
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseCreate {
    pub item_id: String,
    pub quantity: i64,
    pub delivery_address: String,
}

/// Order history row, joined with the item's current name and price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    #[serde(with = "serde_helpers::record_id")]
    pub item: RecordId,
    pub product_name: Option<String>,
    pub unit_price: Option<Decimal>,
    pub quantity_purchased: i64,
    pub delivery_address: String,
    pub total_price: Decimal,
    pub purchased_at: DateTime<Utc>,
}

/// Flat invoice projection returned by the invoice endpoint
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceView {
    pub invoice_id: String,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i64,
    pub total_price: Decimal,
    pub delivery_address: String,
    pub purchased_at: DateTime<Utc>,
    pub buyer: String,
}
