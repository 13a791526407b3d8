//! Request/offer workflow state machine tests
//!
//! Run: cargo test -p mandi-server --test workflow

mod common;

use mandi_server::db::models::{
    OfferStatus, ProductRequestCreate, RequestStatus, Role, SellerOfferCreate, Urgency,
};
use mandi_server::db::repository::CatalogItemRepository;
use mandi_server::utils::AppError;
use mandi_server::workflow::WorkflowService;
use rust_decimal::Decimal;

fn request_payload(name: &str, quantity: i64) -> ProductRequestCreate {
    ProductRequestCreate {
        product_name: name.to_string(),
        description: Some("integration test".to_string()),
        quantity,
        urgency: Urgency::Medium,
    }
}

fn offer_payload(quantity: i64, price: i64, location: &str) -> SellerOfferCreate {
    SellerOfferCreate {
        quantity,
        price: Decimal::from(price),
        message: None,
        location: location.to_string(),
        image: None,
    }
}

#[tokio::test]
async fn create_request_validates_input() {
    let db = common::mem_db().await;
    let alice = common::seed_user_id(&db, "alice", Role::Buyer).await;
    let workflow = WorkflowService::new(db);

    let err = workflow
        .create_request(alice.clone(), request_payload("", 50))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = workflow
        .create_request(alice.clone(), request_payload("Rice", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let request = workflow
        .create_request(alice, request_payload("Rice", 50))
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
    assert!(request.accepted_offer.is_none());
}

#[tokio::test]
async fn broadcast_only_from_pending() {
    let db = common::mem_db().await;
    let alice = common::seed_user_id(&db, "alice", Role::Buyer).await;
    let workflow = WorkflowService::new(db);

    let request = workflow
        .create_request(alice, request_payload("Wheat", 20))
        .await
        .unwrap();
    let request_id = request.id.unwrap().to_string();

    let notified = workflow.broadcast(&request_id).await.unwrap();
    assert_eq!(notified.status, RequestStatus::Notified);

    // Re-broadcast fails loudly
    let err = workflow.broadcast(&request_id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    // Unknown request fails with NotFound
    let err = workflow
        .broadcast("product_request:doesnotexist")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn offers_require_notified_request_and_are_unique_per_seller() {
    let db = common::mem_db().await;
    let alice = common::seed_user_id(&db, "alice", Role::Buyer).await;
    let bob = common::seed_user_id(&db, "bob", Role::Seller).await;
    let workflow = WorkflowService::new(db);

    let request = workflow
        .create_request(alice, request_payload("Rice", 50))
        .await
        .unwrap();
    let request_id = request.id.unwrap().to_string();

    // Request still Pending: not open for offers
    let err = workflow
        .submit_offer(bob.clone(), &request_id, offer_payload(50, 20, "Pune"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    workflow.broadcast(&request_id).await.unwrap();

    let offer = workflow
        .submit_offer(bob.clone(), &request_id, offer_payload(50, 20, "Pune"))
        .await
        .unwrap();
    assert_eq!(offer.status, OfferStatus::Pending);

    // Second offer by the same seller conflicts
    let err = workflow
        .submit_offer(bob, &request_id, offer_payload(40, 18, "Pune"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn offer_payload_is_validated() {
    let db = common::mem_db().await;
    let alice = common::seed_user_id(&db, "alice", Role::Buyer).await;
    let bob = common::seed_user_id(&db, "bob", Role::Seller).await;
    let workflow = WorkflowService::new(db);

    let request = workflow
        .create_request(alice, request_payload("Rice", 50))
        .await
        .unwrap();
    let request_id = request.id.unwrap().to_string();
    workflow.broadcast(&request_id).await.unwrap();

    let err = workflow
        .submit_offer(bob.clone(), &request_id, offer_payload(0, 20, "Pune"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = workflow
        .submit_offer(bob.clone(), &request_id, offer_payload(50, 0, "Pune"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = workflow
        .submit_offer(bob, &request_id, offer_payload(50, 20, ""))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn acceptance_settles_siblings_and_materializes_catalog_item() {
    let db = common::mem_db().await;
    let alice = common::seed_user_id(&db, "alice", Role::Buyer).await;
    let bob = common::seed_user_id(&db, "bob", Role::Seller).await;
    let carol = common::seed_user_id(&db, "carol", Role::Seller).await;
    let workflow = WorkflowService::new(db.clone());

    let request = workflow
        .create_request(alice, request_payload("Rice", 50))
        .await
        .unwrap();
    let request_id = request.id.unwrap().to_string();
    workflow.broadcast(&request_id).await.unwrap();

    let bobs_offer = workflow
        .submit_offer(bob.clone(), &request_id, offer_payload(50, 20, "Pune"))
        .await
        .unwrap();
    let carols_offer = workflow
        .submit_offer(carol, &request_id, offer_payload(45, 22, "Nashik"))
        .await
        .unwrap();

    let bobs_offer_id = bobs_offer.id.unwrap().to_string();
    let outcome = workflow.accept_offer(&bobs_offer_id).await.unwrap();

    // The accepted offer, the fulfilled request, and the catalog item
    assert_eq!(outcome.offer.status, OfferStatus::Accepted);
    assert_eq!(outcome.request.status, RequestStatus::Fulfilled);
    assert_eq!(
        outcome.request.accepted_offer.as_ref().unwrap().to_string(),
        bobs_offer_id
    );
    assert_eq!(outcome.catalog_item.name, "Rice");
    assert_eq!(outcome.catalog_item.price, Decimal::from(20));
    assert_eq!(outcome.catalog_item.quantity, 50);
    assert_eq!(outcome.catalog_item.location, "Pune");
    assert_eq!(outcome.catalog_item.owner, bob);

    // Sibling offers are no longer pending
    let offers = workflow.offers_for_request(&request_id).await.unwrap();
    assert_eq!(offers.len(), 2);
    for offer in &offers {
        assert_ne!(offer.status, OfferStatus::Pending);
    }
    let carols_row = offers
        .iter()
        .find(|o| o.id.as_ref().unwrap().to_string() == carols_offer.id.as_ref().unwrap().to_string())
        .unwrap();
    assert_eq!(carols_row.status, OfferStatus::Rejected);

    // Exactly one accepted offer per request, ever
    let accepted: Vec<_> = offers
        .iter()
        .filter(|o| o.status == OfferStatus::Accepted)
        .collect();
    assert_eq!(accepted.len(), 1);

    // Exactly one catalog item came out of the acceptance
    let catalog = CatalogItemRepository::new(db);
    let items = catalog.find_by_owner(bob).await.unwrap();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn settled_offers_cannot_be_accepted_again() {
    let db = common::mem_db().await;
    let alice = common::seed_user_id(&db, "alice", Role::Buyer).await;
    let bob = common::seed_user_id(&db, "bob", Role::Seller).await;
    let carol = common::seed_user_id(&db, "carol", Role::Seller).await;
    let dave = common::seed_user_id(&db, "dave", Role::Seller).await;
    let workflow = WorkflowService::new(db);

    let request = workflow
        .create_request(alice, request_payload("Rice", 50))
        .await
        .unwrap();
    let request_id = request.id.unwrap().to_string();
    workflow.broadcast(&request_id).await.unwrap();

    let bobs_offer = workflow
        .submit_offer(bob, &request_id, offer_payload(50, 20, "Pune"))
        .await
        .unwrap();
    let carols_offer = workflow
        .submit_offer(carol, &request_id, offer_payload(45, 22, "Nashik"))
        .await
        .unwrap();

    workflow
        .accept_offer(&bobs_offer.id.unwrap().to_string())
        .await
        .unwrap();

    // The rejected sibling cannot be accepted afterwards
    let err = workflow
        .accept_offer(&carols_offer.id.unwrap().to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    // Offers against a fulfilled request are rejected outright
    let err = workflow
        .submit_offer(dave, &request_id, offer_payload(50, 19, "Pune"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[tokio::test]
async fn buyer_and_seller_projections_join_identities() {
    let db = common::mem_db().await;
    let alice = common::seed_user_id(&db, "alice", Role::Buyer).await;
    let bob = common::seed_user_id(&db, "bob", Role::Seller).await;
    let workflow = WorkflowService::new(db);

    let request = workflow
        .create_request(alice.clone(), request_payload("Rice", 50))
        .await
        .unwrap();
    let request_id = request.id.unwrap().to_string();
    workflow.broadcast(&request_id).await.unwrap();

    // Seller-side projections
    let notified = workflow.list_notified().await.unwrap();
    assert_eq!(notified.len(), 1);
    assert_eq!(notified[0].buyer_username.as_deref(), Some("alice"));

    let offer = workflow
        .submit_offer(bob.clone(), &request_id, offer_payload(50, 20, "Pune"))
        .await
        .unwrap();

    let my_ids = workflow.my_offer_request_ids(bob.clone()).await.unwrap();
    assert_eq!(my_ids, vec![request_id.clone()]);

    let my_offers = workflow.my_offers(bob).await.unwrap();
    assert_eq!(my_offers.len(), 1);
    assert_eq!(my_offers[0].request_product_name.as_deref(), Some("Rice"));
    assert_eq!(my_offers[0].request_status, Some(RequestStatus::Notified));

    // Buyer projection joins the accepted offer after acceptance
    workflow
        .accept_offer(&offer.id.unwrap().to_string())
        .await
        .unwrap();

    let mine = workflow.list_mine(alice).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].status, RequestStatus::Fulfilled);
    assert_eq!(mine[0].accepted_seller.as_deref(), Some("bob"));
    assert_eq!(mine[0].accepted_price, Some(Decimal::from(20)));
    assert_eq!(mine[0].accepted_quantity, Some(50));
}
