//! Request/Offer Workflow
//!
//! The demand-side state machine: buyers file product requests, an admin
//! broadcasts them to sellers, sellers submit counter-offers, and an admin
//! accepts exactly one offer per request. Acceptance rejects the sibling
//! offers, fulfils the request, and materializes a catalog item - all in
//! one transaction.
//!
//! State transitions are server-enforced; no API client can set a status
//! field directly.
//!
//! | Entity  | Transition            | Guard |
//! |---------|-----------------------|-------|
//! | Request | Pending -> Notified   | admin broadcast, CAS on status |
//! | Request | Notified -> Fulfilled | admin accept, inside the transaction |
//! | Offer   | (new) -> Pending      | request Notified, no prior offer by this seller |
//! | Offer   | Pending -> Accepted   | admin accept, one per request |
//! | Offer   | Pending -> Rejected   | sibling side-effect of acceptance |

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use crate::db::models::{
    CatalogItem, OfferStatus, OfferWithRequest, OfferWithSeller, ProductRequest,
    ProductRequestCreate, RequestStatus, RequestWithAcceptedOffer, RequestWithBuyer, SellerOffer,
    SellerOfferCreate,
};
use crate::db::repository::{
    ProductRequestRepository, SellerOfferRepository, parse_record_id,
};
use crate::utils::validation::{
    MAX_IMAGE_REF_LEN, MAX_LOCATION_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text,
    validate_positive_price, validate_positive_quantity, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Outcome of an acceptance: the settled offer, the fulfilled request, and
/// the catalog item the workflow materialized.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AcceptOutcome {
    pub offer: SellerOffer,
    pub request: ProductRequest,
    pub catalog_item: CatalogItem,
}

/// Request/offer workflow over the embedded database
#[derive(Clone)]
pub struct WorkflowService {
    db: Surreal<Db>,
    requests: ProductRequestRepository,
    offers: SellerOfferRepository,
}

impl WorkflowService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            requests: ProductRequestRepository::new(db.clone()),
            offers: SellerOfferRepository::new(db.clone()),
            db,
        }
    }

    /// Buyer files a new demand record (initial state: Pending)
    pub async fn create_request(
        &self,
        buyer: RecordId,
        data: ProductRequestCreate,
    ) -> AppResult<ProductRequest> {
        validate_required_text(&data.product_name, "product_name", MAX_NAME_LEN)?;
        validate_positive_quantity(data.quantity, "quantity")?;
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;

        let request = self.requests.create(buyer, data).await?;
        Ok(request)
    }

    /// Admin broadcasts a Pending request to sellers (Pending -> Notified)
    ///
    /// Re-broadcast fails loudly rather than silently: a request that is
    /// already Notified or Fulfilled is a stale transition.
    pub async fn broadcast(&self, request_id: &str) -> AppResult<ProductRequest> {
        let existing = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product request {} not found", request_id)))?;

        if existing.status != RequestStatus::Pending {
            return Err(AppError::invalid_state(
                "Request already broadcast or fulfilled",
            ));
        }

        // CAS on the status field closes the race window between the read
        // above and this write.
        match self.requests.mark_notified(request_id).await? {
            Some(updated) => Ok(updated),
            None => Err(AppError::invalid_state(
                "Request already broadcast or fulfilled",
            )),
        }
    }

    /// Seller submits an offer against a Notified request
    pub async fn submit_offer(
        &self,
        seller: RecordId,
        request_id: &str,
        data: SellerOfferCreate,
    ) -> AppResult<SellerOffer> {
        validate_positive_quantity(data.quantity, "quantity")?;
        validate_positive_price(data.price, "price")?;
        validate_required_text(&data.location, "location", MAX_LOCATION_LEN)?;
        validate_optional_text(&data.message, "message", MAX_NOTE_LEN)?;
        validate_optional_text(&data.image, "image", MAX_IMAGE_REF_LEN)?;

        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product request {} not found", request_id)))?;

        if request.status != RequestStatus::Notified {
            return Err(AppError::invalid_state(
                "Request is not open for offers",
            ));
        }

        let request_rid = request
            .id
            .ok_or_else(|| AppError::internal("Stored request has no id"))?;

        if self
            .offers
            .exists_for(seller.clone(), request_rid.clone())
            .await?
        {
            return Err(AppError::conflict(
                "You have already submitted an offer for this request",
            ));
        }

        let offer = self.offers.create(seller, request_rid, data).await?;
        Ok(offer)
    }

    /// Admin accepts one offer: one atomic transaction
    ///
    /// (a) every other Pending offer on the request -> Rejected,
    /// (b) this offer -> Accepted,
    /// (c) the request -> Fulfilled with `accepted_offer` set,
    /// (d) a catalog item is created from the request name and the winning
    ///     offer's terms, owned by the winning seller.
    ///
    /// The status guards re-run inside the transaction, so two admins
    /// racing on the same request settle exactly one offer.
    pub async fn accept_offer(&self, offer_id: &str) -> AppResult<AcceptOutcome> {
        let offer = self
            .offers
            .find_by_id(offer_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Offer {} not found", offer_id)))?;

        if offer.status != OfferStatus::Pending {
            return Err(AppError::invalid_state("Offer has already been settled"));
        }

        let request = self
            .requests
            .find_by_id(&offer.request.to_string())
            .await?
            .ok_or_else(|| AppError::not_found("Associated product request not found"))?;

        if request.status != RequestStatus::Notified {
            return Err(AppError::invalid_state(
                "Request is not open for acceptance",
            ));
        }

        let offer_rid = parse_record_id("seller_offer", offer_id)?;

        let mut result = self
            .db
            .query(
                "BEGIN TRANSACTION; \
                 LET $offer = (SELECT * FROM $offer_id)[0]; \
                 IF $offer IS NONE { THROW 'offer_missing' }; \
                 IF $offer.status != 'Pending' { THROW 'offer_settled' }; \
                 LET $req = (SELECT * FROM $offer.request)[0]; \
                 IF $req IS NONE { THROW 'request_missing' }; \
                 IF $req.status != 'Notified' { THROW 'request_closed' }; \
                 UPDATE seller_offer SET status = 'Rejected' \
                     WHERE request = $offer.request AND id != $offer_id AND status = 'Pending'; \
                 UPDATE $offer_id SET status = 'Accepted'; \
                 UPDATE $offer.request SET status = 'Fulfilled', accepted_offer = $offer_id; \
                 CREATE catalog_item CONTENT { \
                     name: $req.product_name, \
                     price: $offer.price, \
                     quantity: $offer.quantity, \
                     location: $offer.location, \
                     image: $offer.image, \
                     owner: $offer.seller, \
                     created_at: $now \
                 }; \
                 COMMIT TRANSACTION;",
            )
            .bind(("offer_id", offer_rid))
            .bind(("now", chrono::Utc::now()))
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        // A THROW aborts the whole transaction and errors every statement;
        // scan them all for the guard marker.
        let errors = result.take_errors();
        if !errors.is_empty() {
            let combined = errors
                .into_values()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(map_accept_error(&combined));
        }

        let last = result.num_statements() - 1;
        let catalog_item: Option<CatalogItem> = result
            .take(last)
            .map_err(|e| AppError::database(e.to_string()))?;
        let catalog_item = catalog_item
            .ok_or_else(|| AppError::database("Acceptance did not materialize a catalog item"))?;

        // Re-read the settled rows for the response payload
        let offer = self
            .offers
            .find_by_id(offer_id)
            .await?
            .ok_or_else(|| AppError::internal("Accepted offer vanished"))?;
        let request = self
            .requests
            .find_by_id(&offer.request.to_string())
            .await?
            .ok_or_else(|| AppError::internal("Fulfilled request vanished"))?;

        Ok(AcceptOutcome {
            offer,
            request,
            catalog_item,
        })
    }

    // ── Read projections ────────────────────────────────────────────

    /// Admin: all requests, buyer username joined
    pub async fn list_all(&self) -> AppResult<Vec<RequestWithBuyer>> {
        Ok(self.requests.find_all_with_buyer().await?)
    }

    /// Seller: requests currently open for offers
    pub async fn list_notified(&self) -> AppResult<Vec<RequestWithBuyer>> {
        Ok(self.requests.find_notified().await?)
    }

    /// Buyer: own requests, accepted offer and its seller joined
    pub async fn list_mine(&self, buyer: RecordId) -> AppResult<Vec<RequestWithAcceptedOffer>> {
        Ok(self.requests.find_mine(buyer).await?)
    }

    /// Admin: offers on one request, seller username joined
    pub async fn offers_for_request(&self, request_id: &str) -> AppResult<Vec<OfferWithSeller>> {
        let rid = parse_record_id("product_request", request_id)?;
        Ok(self.offers.find_by_request(rid).await?)
    }

    /// Seller: request ids already offered on
    pub async fn my_offer_request_ids(&self, seller: RecordId) -> AppResult<Vec<String>> {
        Ok(self.offers.request_ids_for_seller(seller).await?)
    }

    /// Seller: own offers with request context
    pub async fn my_offers(&self, seller: RecordId) -> AppResult<Vec<OfferWithRequest>> {
        Ok(self.offers.find_by_seller(seller).await?)
    }
}

/// Translate in-transaction THROW guards into the error taxonomy
fn map_accept_error(msg: &str) -> AppError {
    if msg.contains("offer_settled") {
        AppError::invalid_state("Offer has already been settled")
    } else if msg.contains("request_closed") {
        AppError::invalid_state("Request is not open for acceptance")
    } else if msg.contains("offer_missing") {
        AppError::not_found("Offer not found")
    } else if msg.contains("request_missing") {
        AppError::not_found("Associated product request not found")
    } else {
        AppError::database(msg)
    }
}
