//! Product Request Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{
    ProductRequest, ProductRequestCreate, RequestStatus, RequestWithAcceptedOffer, RequestWithBuyer,
};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const REQUEST_TABLE: &str = "product_request";

#[derive(Clone)]
pub struct ProductRequestRepository {
    base: BaseRepository,
}

impl ProductRequestRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find request by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ProductRequest>> {
        let rid = parse_record_id(REQUEST_TABLE, id)?;
        let request: Option<ProductRequest> = self.base.db().select(rid).await?;
        Ok(request)
    }

    /// Create a new request in Pending state for the given buyer
    pub async fn create(
        &self,
        buyer: RecordId,
        data: ProductRequestCreate,
    ) -> RepoResult<ProductRequest> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE product_request SET
                    buyer = $buyer,
                    product_name = $product_name,
                    description = $description,
                    quantity = $quantity,
                    urgency = $urgency,
                    status = $status,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("buyer", buyer))
            .bind(("product_name", data.product_name))
            .bind(("description", data.description))
            .bind(("quantity", data.quantity))
            .bind(("urgency", data.urgency))
            .bind(("status", RequestStatus::Pending))
            .bind(("created_at", chrono::Utc::now()))
            .await?;

        let created: Option<ProductRequest> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create product request".to_string()))
    }

    /// All requests with the buyer's username joined, newest first (admin view)
    pub async fn find_all_with_buyer(&self) -> RepoResult<Vec<RequestWithBuyer>> {
        let requests: Vec<RequestWithBuyer> = self
            .base
            .db()
            .query(
                "SELECT *, buyer.username AS buyer_username FROM product_request \
                 ORDER BY created_at DESC",
            )
            .await?
            .take(0)?;
        Ok(requests)
    }

    /// Broadcast requests visible to sellers
    pub async fn find_notified(&self) -> RepoResult<Vec<RequestWithBuyer>> {
        let requests: Vec<RequestWithBuyer> = self
            .base
            .db()
            .query(
                "SELECT *, buyer.username AS buyer_username FROM product_request \
                 WHERE status = 'Notified' ORDER BY created_at DESC",
            )
            .await?
            .take(0)?;
        Ok(requests)
    }

    /// A buyer's own requests with the accepted offer joined when present
    pub async fn find_mine(&self, buyer: RecordId) -> RepoResult<Vec<RequestWithAcceptedOffer>> {
        let requests: Vec<RequestWithAcceptedOffer> = self
            .base
            .db()
            .query(
                "SELECT *, \
                     accepted_offer.price AS accepted_price, \
                     accepted_offer.quantity AS accepted_quantity, \
                     accepted_offer.location AS accepted_location, \
                     accepted_offer.seller.username AS accepted_seller \
                 FROM product_request WHERE buyer = $buyer ORDER BY created_at DESC",
            )
            .bind(("buyer", buyer))
            .await?
            .take(0)?;
        Ok(requests)
    }

    /// Compare-and-swap the status from Pending to Notified
    ///
    /// Returns the updated request, or None if the row was not in Pending
    /// (lost a race, or was already settled).
    pub async fn mark_notified(&self, id: &str) -> RepoResult<Option<ProductRequest>> {
        let rid = parse_record_id(REQUEST_TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE product_request SET status = 'Notified' \
                 WHERE id = $id AND status = 'Pending' RETURN AFTER",
            )
            .bind(("id", rid))
            .await?;
        let updated: Vec<ProductRequest> = result.take(0)?;
        Ok(updated.into_iter().next())
    }
}
