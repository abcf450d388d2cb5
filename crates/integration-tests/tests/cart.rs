//! Session cart endpoints.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};
use terp_haus_integration_tests::TestContext;

async fn add(ctx: &TestContext, product_id: &str, quantity: i64) -> reqwest::Response {
    ctx.client
        .post(ctx.url("/api/cart/items"))
        .json(&json!({ "productId": product_id, "quantity": quantity }))
        .send()
        .await
        .unwrap()
}

async fn cart(ctx: &TestContext) -> Value {
    let resp = ctx.client.get(ctx.url("/api/cart")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json::<Value>().await.unwrap()["data"].clone()
}

#[tokio::test]
async fn test_new_session_has_empty_cart() {
    let ctx = TestContext::new().await;

    let cart = cart(&ctx).await;
    assert_eq!(cart["items"], json!([]));
    assert_eq!(cart["itemCount"], 0);
    assert_eq!(cart["total"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn test_add_accumulates_at_catalog_price() {
    let ctx = TestContext::new().await;

    assert_eq!(add(&ctx, "p1", 2).await.status(), StatusCode::OK);
    let resp = add(&ctx, "p1", 1).await;
    let body: Value = resp.json().await.unwrap();

    let cart = &body["data"];
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["itemCount"], 3);
    assert_eq!(cart["total"].as_f64(), Some(105.0));
    assert_eq!(cart["items"][0]["price"].as_f64(), Some(35.0));

    let item: Value = ctx
        .client
        .get(ctx.url("/api/cart/items/p1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(item["data"], json!({ "quantity": 3, "inCart": true }));
}

#[tokio::test]
async fn test_quantity_edits() {
    let ctx = TestContext::new().await;
    add(&ctx, "p1", 1).await;
    add(&ctx, "p2", 1).await;

    let resp = ctx
        .client
        .put(ctx.url("/api/cart/items/p1"))
        .json(&json!({ "quantity": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(cart(&ctx).await["itemCount"], 5);

    ctx.client
        .post(ctx.url("/api/cart/items/p2/increment"))
        .send()
        .await
        .unwrap();
    ctx.client
        .post(ctx.url("/api/cart/items/p1/decrement"))
        .send()
        .await
        .unwrap();
    let state = cart(&ctx).await;
    assert_eq!(state["itemCount"], 5);
    assert_eq!(state["total"].as_f64(), Some(175.0));

    // quantity 0 removes the line
    ctx.client
        .put(ctx.url("/api/cart/items/p1"))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .unwrap();
    let state = cart(&ctx).await;
    assert_eq!(state["items"].as_array().unwrap().len(), 1);
    assert_eq!(state["items"][0]["productId"], "p2");

    // decrement at 1 removes too
    ctx.client
        .post(ctx.url("/api/cart/items/p2/decrement"))
        .send()
        .await
        .unwrap();
    ctx.client
        .post(ctx.url("/api/cart/items/p2/decrement"))
        .send()
        .await
        .unwrap();
    assert_eq!(cart(&ctx).await["itemCount"], 0);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let ctx = TestContext::new().await;
    add(&ctx, "p1", 2).await;
    add(&ctx, "p2", 1).await;

    ctx.client
        .delete(ctx.url("/api/cart/items/p1"))
        .send()
        .await
        .unwrap();
    let item: Value = ctx
        .client
        .get(ctx.url("/api/cart/items/p1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(item["data"], json!({ "quantity": 0, "inCart": false }));

    let resp = ctx.client.delete(ctx.url("/api/cart")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(cart(&ctx).await["items"], json!([]));
}

#[tokio::test]
async fn test_add_rejects_bad_input() {
    let ctx = TestContext::new().await;

    let resp = add(&ctx, "p1", 0).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "quantity must be at least 1");

    let resp = add(&ctx, "missing", 1).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = ctx
        .client
        .post(ctx.url("/api/cart/items"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);

    assert_eq!(cart(&ctx).await["itemCount"], 0);
}

#[tokio::test]
async fn test_carts_are_per_session() {
    let ctx = TestContext::new().await;
    add(&ctx, "p1", 2).await;

    let stranger = reqwest::Client::new();
    let body: Value = stranger
        .get(ctx.url("/api/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["itemCount"], 0);
    assert_eq!(cart(&ctx).await["itemCount"], 2);
}
