//! HTTP-level API tests: auth, role gates, ownership, and the full
//! request-to-purchase flow
//!
//! Run: cargo test -p mandi-server --test api

mod common;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use mandi_server::core::router::build_app;

async fn app() -> Router {
    let db = common::mem_db().await;
    build_app(common::test_state(db))
}

async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register(app: &Router, username: &str, role: &str) {
    let (status, _) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"username": username, "password": "password1", "role": role})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "registering {username}");
}

async fn login(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"username": username, "password": "password1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "logging in {username}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_rejects_duplicates_and_login_issues_tokens() {
    let app = app().await;

    register(&app, "alice", "Buyer").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"username": "alice", "password": "password1", "role": "Buyer"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("already exists"));

    let token = login(&app, "alice").await;

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "Buyer");

    // Wrong password gets the unified message
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"username": "alice", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = app().await;

    let (status, _) = send(&app, "GET", "/api/products", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/products", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_gates_reject_wrong_roles() {
    let app = app().await;
    register(&app, "alice", "Buyer").await;
    register(&app, "bob", "Seller").await;
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;

    // Buyers cannot list inventory into the catalog
    let (status, _) = send(
        &app,
        "POST",
        "/api/products",
        Some(&alice),
        Some(json!({"name": "Rice", "price": 20, "quantity": 50, "location": "Pune"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Sellers cannot broadcast requests
    let (status, _) = send(
        &app,
        "POST",
        "/api/requests/product_request:x/broadcast",
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Sellers cannot read the owner dashboard
    let (status, _) = send(&app, "GET", "/api/stats", Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn sellers_see_own_products_and_cannot_touch_others() {
    let app = app().await;
    register(&app, "bob", "Seller").await;
    register(&app, "carol", "Seller").await;
    register(&app, "root", "Admin").await;
    let bob = login(&app, "bob").await;
    let carol = login(&app, "carol").await;
    let admin = login(&app, "root").await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/products",
        Some(&bob),
        Some(json!({"name": "Rice", "price": 20, "quantity": 50, "location": "Pune"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let item_id = created["data"]["id"].as_str().unwrap().to_string();

    send(
        &app,
        "POST",
        "/api/products",
        Some(&carol),
        Some(json!({"name": "Lentils", "price": 40, "quantity": 10, "location": "Nashik"})),
    )
    .await;

    // Seller listing is scoped to the caller
    let (_, bobs) = send(&app, "GET", "/api/products", Some(&bob), None).await;
    assert_eq!(bobs.as_array().unwrap().len(), 1);
    assert_eq!(bobs[0]["name"], "Rice");

    // Admin sees everything
    let (_, all) = send(&app, "GET", "/api/products", Some(&admin), None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    // Another seller cannot update or delete bob's row
    let path = format!("/api/products/{item_id}");
    let (status, _) = send(
        &app,
        "PUT",
        &path,
        Some(&carol),
        Some(json!({"price": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &path, Some(&carol), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin can
    let (status, updated) = send(
        &app,
        "PUT",
        &path,
        Some(&admin),
        Some(json!({"price": 25})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["price"], "25");

    // Absent ids are 404
    let (status, _) = send(
        &app,
        "PUT",
        "/api/products/catalog_item:missing",
        Some(&admin),
        Some(json!({"price": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn full_marketplace_flow_over_http() {
    let app = app().await;
    register(&app, "alice", "Buyer").await;
    register(&app, "bob", "Seller").await;
    register(&app, "root", "Admin").await;
    register(&app, "boss", "Owner").await;
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;
    let admin = login(&app, "root").await;
    let boss = login(&app, "boss").await;

    // Buyer requests 50 Rice
    let (status, created) = send(
        &app,
        "POST",
        "/api/requests",
        Some(&alice),
        Some(json!({"product_name": "Rice", "quantity": 50})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let request_id = created["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["status"], "Pending");

    // Admin broadcasts
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/requests/{request_id}/broadcast"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Seller sees it and offers 50 @ 20 from Pune
    let (_, notified) = send(&app, "GET", "/api/requests/notified", Some(&bob), None).await;
    assert_eq!(notified.as_array().unwrap().len(), 1);

    let (status, offered) = send(
        &app,
        "POST",
        &format!("/api/offers/{request_id}"),
        Some(&bob),
        Some(json!({"quantity": 50, "price": 20, "location": "Pune"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let offer_id = offered["data"]["id"].as_str().unwrap().to_string();

    // Admin inspects and accepts
    let (_, offers) = send(
        &app,
        "GET",
        &format!("/api/offers/request/{request_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(offers[0]["seller_username"], "bob");

    let (status, outcome) = send(
        &app,
        "POST",
        &format!("/api/offers/{offer_id}/accept"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["data"]["request"]["status"], "Fulfilled");
    let item_id = outcome["data"]["catalog_item"]["id"].as_str().unwrap().to_string();
    assert_eq!(outcome["data"]["catalog_item"]["name"], "Rice");
    assert_eq!(outcome["data"]["catalog_item"]["quantity"], 50);

    // Accepting twice is a stale transition
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/offers/{offer_id}/accept"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Buyer purchases 10 of the new catalog item
    let (status, purchased) = send(
        &app,
        "POST",
        "/api/purchase",
        Some(&alice),
        Some(json!({
            "item_id": item_id,
            "quantity": 10,
            "delivery_address": "12 Market Road, Pune"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(purchased["data"]["total_price"], "200");
    let order_id = purchased["data"]["id"].as_str().unwrap().to_string();

    // Stock went from 50 to 40
    let (_, items) = send(&app, "GET", "/api/products", Some(&alice), None).await;
    assert_eq!(items[0]["quantity"], 40);

    // Overselling the remaining stock fails
    let (status, _) = send(
        &app,
        "POST",
        "/api/purchase",
        Some(&alice),
        Some(json!({
            "item_id": item_id,
            "quantity": 41,
            "delivery_address": "12 Market Road, Pune"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Invoice reflects the purchase-time snapshot
    let (status, invoice) = send(
        &app,
        "GET",
        &format!("/api/purchase/invoice/{order_id}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(invoice["product_name"], "Rice");
    assert_eq!(invoice["unit_price"], "20");
    assert_eq!(invoice["total_price"], "200");
    assert_eq!(invoice["buyer"], "alice");

    // Buyer history
    let (_, orders) = send(&app, "GET", "/api/purchase/my-orders", Some(&alice), None).await;
    assert_eq!(orders.as_array().unwrap().len(), 1);

    // Owner dashboard
    let (status, stats) = send(&app, "GET", "/api/stats", Some(&boss), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_products"], 1);
    assert_eq!(stats["total_quantity"], 40);
    assert_eq!(stats["total_sellers"], 1);
    assert_eq!(stats["total_buyers"], 1);
    assert_eq!(stats["top_sellers"][0]["seller"], "bob");
}
