//! Purchase Order Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{CatalogItem, Invoice, InvoiceLine, Order, OrderWithItem};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "purchase_order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create the order and decrement stock in a single transaction
    ///
    /// The invoice snapshot is built from the item as read by the caller;
    /// the stock guard re-runs inside the transaction so a concurrent
    /// purchase cannot oversell. On a tripped guard the whole transaction
    /// rolls back and stock is unchanged.
    pub async fn purchase_atomic(
        &self,
        item: &CatalogItem,
        buyer_username: &str,
        quantity: i64,
        delivery_address: String,
    ) -> RepoResult<Order> {
        let item_id = item
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Catalog item has no id".to_string()))?;

        let now = chrono::Utc::now();
        let total_price = item.price * rust_decimal::Decimal::from(quantity);
        let invoice = Invoice {
            generated_at: now,
            items: vec![InvoiceLine {
                product_name: item.name.clone(),
                unit_price: item.price,
                quantity,
                line_total: total_price,
            }],
            total_amount: total_price,
        };

        let mut result = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 LET $it = (SELECT * FROM $item_id)[0]; \
                 IF $it IS NONE { THROW 'item_missing' }; \
                 IF $it.quantity < $qty { THROW 'insufficient_stock' }; \
                 UPDATE $item_id SET quantity -= $qty; \
                 CREATE purchase_order SET \
                     item = $item_id, \
                     buyer = $buyer, \
                     quantity_purchased = $qty, \
                     delivery_address = $delivery_address, \
                     total_price = $total_price, \
                     invoice = $invoice, \
                     purchased_at = $now \
                 RETURN AFTER; \
                 COMMIT TRANSACTION;",
            )
            .bind(("item_id", item_id))
            .bind(("qty", quantity))
            .bind(("buyer", buyer_username.to_string()))
            .bind(("delivery_address", delivery_address))
            .bind(("total_price", total_price))
            .bind(("invoice", invoice))
            .bind(("now", now))
            .await?;

        // A THROW aborts the whole transaction and errors every statement;
        // scan them all for the guard marker.
        let errors = result.take_errors();
        if !errors.is_empty() {
            let combined = errors
                .into_values()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(map_purchase_error(&combined));
        }

        let last = result.num_statements() - 1;
        let created: Option<Order> = result.take(last)?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let rid = parse_record_id(ORDER_TABLE, id)?;
        let order: Option<Order> = self.base.db().select(rid).await?;
        Ok(order)
    }

    /// A buyer's order history with the item joined, newest first
    pub async fn find_mine(&self, buyer_username: &str) -> RepoResult<Vec<OrderWithItem>> {
        let buyer = buyer_username.to_string();
        let orders: Vec<OrderWithItem> = self
            .base
            .db()
            .query(
                "SELECT *, item.name AS product_name, item.price AS unit_price \
                 FROM purchase_order WHERE buyer = $buyer ORDER BY purchased_at DESC",
            )
            .bind(("buyer", buyer))
            .await?
            .take(0)?;
        Ok(orders)
    }
}

/// Translate in-transaction THROW guards into repository errors
fn map_purchase_error(msg: &str) -> RepoError {
    if msg.contains("insufficient_stock") {
        RepoError::InsufficientStock("Not enough stock available".to_string())
    } else if msg.contains("item_missing") {
        RepoError::NotFound("Catalog item not found".to_string())
    } else {
        RepoError::Database(msg.to_string())
    }
}
