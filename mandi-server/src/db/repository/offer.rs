//! Seller Offer Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{
    OfferStatus, OfferWithRequest, OfferWithSeller, SellerOffer, SellerOfferCreate,
};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const OFFER_TABLE: &str = "seller_offer";

#[derive(Clone)]
pub struct SellerOfferRepository {
    base: BaseRepository,
}

impl SellerOfferRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find offer by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<SellerOffer>> {
        let rid = parse_record_id(OFFER_TABLE, id)?;
        let offer: Option<SellerOffer> = self.base.db().select(rid).await?;
        Ok(offer)
    }

    /// Whether this seller already has an offer on the request
    ///
    /// The write-time guard behind the one-offer-per-(seller, request)
    /// invariant.
    pub async fn exists_for(&self, seller: RecordId, request: RecordId) -> RepoResult<bool> {
        #[derive(serde::Deserialize)]
        struct Found {
            #[allow(dead_code)]
            #[serde(with = "crate::db::models::serde_helpers::record_id")]
            id: RecordId,
        }

        let mut result = self
            .base
            .db()
            .query(
                "SELECT id FROM seller_offer \
                 WHERE seller = $seller AND request = $request LIMIT 1",
            )
            .bind(("seller", seller))
            .bind(("request", request))
            .await?;
        let found: Vec<Found> = result.take(0)?;
        Ok(!found.is_empty())
    }

    /// Persist a new Pending offer
    pub async fn create(
        &self,
        seller: RecordId,
        request: RecordId,
        data: SellerOfferCreate,
    ) -> RepoResult<SellerOffer> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE seller_offer SET
                    seller = $seller,
                    request = $request,
                    quantity = $quantity,
                    price = $price,
                    message = $message,
                    location = $location,
                    image = $image,
                    status = $status,
                    offered_at = $offered_at
                RETURN AFTER"#,
            )
            .bind(("seller", seller))
            .bind(("request", request))
            .bind(("quantity", data.quantity))
            .bind(("price", data.price))
            .bind(("message", data.message))
            .bind(("location", data.location))
            .bind(("image", data.image))
            .bind(("status", OfferStatus::Pending))
            .bind(("offered_at", chrono::Utc::now()))
            .await?;

        let created: Option<SellerOffer> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create offer".to_string()))
    }

    /// All offers on a request with the seller's username joined (admin view)
    pub async fn find_by_request(&self, request: RecordId) -> RepoResult<Vec<OfferWithSeller>> {
        let offers: Vec<OfferWithSeller> = self
            .base
            .db()
            .query(
                "SELECT *, seller.username AS seller_username FROM seller_offer \
                 WHERE request = $request ORDER BY offered_at",
            )
            .bind(("request", request))
            .await?
            .take(0)?;
        Ok(offers)
    }

    /// Request ids this seller has offered on, as "table:key" strings
    pub async fn request_ids_for_seller(&self, seller: RecordId) -> RepoResult<Vec<String>> {
        #[derive(serde::Deserialize)]
        struct Row {
            #[serde(with = "crate::db::models::serde_helpers::record_id")]
            request: RecordId,
        }

        let mut result = self
            .base
            .db()
            .query("SELECT request FROM seller_offer WHERE seller = $seller")
            .bind(("seller", seller))
            .await?;
        let rows: Vec<Row> = result.take(0)?;
        Ok(rows.into_iter().map(|r| r.request.to_string()).collect())
    }

    /// A seller's own offers with the request's headline fields joined
    pub async fn find_by_seller(&self, seller: RecordId) -> RepoResult<Vec<OfferWithRequest>> {
        let offers: Vec<OfferWithRequest> = self
            .base
            .db()
            .query(
                "SELECT *, \
                     request.product_name AS request_product_name, \
                     request.description AS request_description, \
                     request.status AS request_status \
                 FROM seller_offer WHERE seller = $seller ORDER BY offered_at DESC",
            )
            .bind(("seller", seller))
            .await?
            .take(0)?;
        Ok(offers)
    }
}
