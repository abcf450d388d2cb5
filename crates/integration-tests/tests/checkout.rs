//! Order submission and cart checkout.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};
use terp_haus_integration_tests::{FlowhubMode, TestContext};

const ADULT: &str = "1990-01-01";
const MINOR: &str = "2015-01-01";

async fn add(ctx: &TestContext, product_id: &str, quantity: i64) {
    let resp = ctx
        .client
        .post(ctx.url("/api/cart/items"))
        .json(&json!({ "productId": product_id, "quantity": quantity }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

async fn checkout(ctx: &TestContext, date_of_birth: &str) -> reqwest::Response {
    ctx.client
        .post(ctx.url("/api/cart/checkout"))
        .json(&json!({
            "customer": TestContext::customer(date_of_birth),
            "pickupTime": "2024-06-15T18:00:00Z",
            "notes": "call on arrival",
        }))
        .send()
        .await
        .unwrap()
}

async fn cart_count(ctx: &TestContext) -> Value {
    let body: Value = ctx
        .client
        .get(ctx.url("/api/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["data"]["itemCount"].clone()
}

#[tokio::test]
async fn test_cart_checkout_creates_order_and_clears_cart() {
    let ctx = TestContext::new().await;
    add(&ctx, "p1", 2).await;

    let resp = checkout(&ctx, ADULT).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    let order = &body["data"];
    assert_eq!(body["success"], true);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total"].as_f64(), Some(70.0));
    assert_eq!(order["customer"]["isAgeVerified"], true);
    assert_eq!(order["items"][0]["product"], Value::Null);

    let sent = ctx.flowhub.created_orders();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["items"][0]["productId"], "p1");
    assert_eq!(sent[0]["items"][0]["quantity"], 2);
    assert_eq!(sent[0]["items"][0]["price"].as_f64(), Some(35.0));
    assert_eq!(sent[0]["customer"]["dateOfBirth"], ADULT);
    assert_eq!(sent[0]["notes"], "call on arrival");

    assert_eq!(cart_count(&ctx).await, 0);
}

#[tokio::test]
async fn test_underage_checkout_keeps_cart() {
    let ctx = TestContext::new().await;
    add(&ctx, "p1", 1).await;

    let resp = checkout(&ctx, MINOR).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "must be 21 or older");

    assert!(ctx.flowhub.created_orders().is_empty());
    assert_eq!(cart_count(&ctx).await, 1);
}

#[tokio::test]
async fn test_empty_cart_checkout_is_rejected() {
    let ctx = TestContext::new().await;

    let resp = checkout(&ctx, ADULT).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "items required");
    assert!(ctx.flowhub.created_orders().is_empty());
}

#[tokio::test]
async fn test_direct_order_submission() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/api/orders"))
        .json(&json!({
            "items": [
                { "productId": "p1", "quantity": 1, "price": 20.0 },
                { "productId": "p2", "quantity": 3, "price": 10.0 }
            ],
            "customer": TestContext::customer(ADULT),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["total"].as_f64(), Some(50.0));
    assert_eq!(ctx.flowhub.created_orders().len(), 1);
}

#[tokio::test]
async fn test_order_validation_happens_before_flowhub() {
    let ctx = TestContext::new().await;

    let cases = [
        (json!({ "items": [], "customer": TestContext::customer(ADULT) }), "items required"),
        (
            json!({ "items": [{ "productId": "p1", "quantity": 1, "price": 20.0 }] }),
            "customer info required",
        ),
        (
            json!({
                "items": [{ "productId": "p1", "quantity": 1, "price": 20.0 }],
                "customer": TestContext::customer("not-a-date"),
            }),
            "invalid date of birth",
        ),
        (
            json!({
                "items": [{ "productId": "p1", "quantity": 1, "price": 20.0 }],
                "customer": TestContext::customer(MINOR),
            }),
            "must be 21 or older",
        ),
    ];

    for (payload, expected) in cases {
        let resp = ctx
            .client
            .post(ctx.url("/api/orders"))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{expected}");
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], expected);
    }

    assert!(ctx.flowhub.created_orders().is_empty());
}

#[tokio::test]
async fn test_order_rejected_by_flowhub_is_502() {
    let ctx = TestContext::with_mode(FlowhubMode::Down).await;

    let resp = ctx
        .client
        .post(ctx.url("/api/orders"))
        .json(&json!({
            "items": [{ "productId": "p1", "quantity": 1, "price": 20.0 }],
            "customer": TestContext::customer(ADULT),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body: Value = resp.json().await.unwrap();
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("order creation failed: "), "{error}");
    assert!(error.contains("flowhub down"), "{error}");
}

#[tokio::test]
async fn test_order_submission_is_rate_limited() {
    let ctx = TestContext::new().await;
    let payload = json!({ "items": [] });

    let mut statuses = Vec::new();
    for _ in 0..8 {
        let resp = ctx
            .client
            .post(ctx.url("/api/orders"))
            .json(&payload)
            .send()
            .await
            .unwrap();
        statuses.push(resp.status());
    }

    assert_eq!(statuses[0], StatusCode::BAD_REQUEST);
    assert!(statuses.contains(&StatusCode::TOO_MANY_REQUESTS));
}
