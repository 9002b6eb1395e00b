//! Integration tests for the smart-add bulk copy flow.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p bodega-server)
//!
//! Run with: cargo test -p bodega-integration-tests -- --ignored

use serde_json::{Value, json};

use bodega_integration_tests::TestContext;

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_bulk_add_creates_selections_and_products() {
    let ctx = TestContext::new().await;
    let merchant = ctx.another_client();
    let (merchant_id, _) = ctx.register_merchant(&merchant).await;
    ctx.onboard(&merchant, "Grocery").await;

    let category_id = ctx.seed_category("Grocery").await;
    let first = ctx.seed_master_product(category_id, "Bulk Tea").await;
    let second = ctx.seed_master_product(category_id, "Bulk Coffee").await;

    let resp = merchant
        .post(ctx.url("/api/smart-add/bulk-add"))
        .json(&json!({"category_id": category_id, "product_ids": [first, second]}))
        .send()
        .await
        .expect("bulk add failed");

    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.expect("bulk add body");
    assert_eq!(body["added_count"], 2);

    let selections = ctx
        .count(
            "SELECT COUNT(*) FROM smart_add_selections WHERE merchant_id = $1",
            merchant_id,
        )
        .await;
    assert_eq!(selections, 2);

    let products = ctx
        .count("SELECT COUNT(*) FROM products WHERE merchant_id = $1", merchant_id)
        .await;
    assert_eq!(products, 2);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_duplicate_bulk_add_rejected_without_new_rows() {
    let ctx = TestContext::new().await;
    let merchant = ctx.another_client();
    let (merchant_id, _) = ctx.register_merchant(&merchant).await;
    ctx.onboard(&merchant, "Grocery").await;

    let category_id = ctx.seed_category("Grocery").await;
    let product = ctx.seed_master_product(category_id, "Bulk Sugar").await;

    let resp = merchant
        .post(ctx.url("/api/smart-add/bulk-add"))
        .json(&json!({"category_id": category_id, "product_ids": [product]}))
        .send()
        .await
        .expect("first bulk add failed");
    assert_eq!(resp.status(), 201);

    // The same id a second time fails the whole batch with "already added"
    let resp = merchant
        .post(ctx.url("/api/smart-add/bulk-add"))
        .json(&json!({"category_id": category_id, "product_ids": [product]}))
        .send()
        .await
        .expect("second bulk add failed");
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.expect("error body");
    assert!(body["error"].as_str().expect("error text").contains("already added"));

    let selections = ctx
        .count(
            "SELECT COUNT(*) FROM smart_add_selections WHERE merchant_id = $1",
            merchant_id,
        )
        .await;
    assert_eq!(selections, 1);
    let products = ctx
        .count("SELECT COUNT(*) FROM products WHERE merchant_id = $1", merchant_id)
        .await;
    assert_eq!(products, 1);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_business_category_mismatch_rejects_batch() {
    let ctx = TestContext::new().await;
    let merchant = ctx.another_client();
    let (merchant_id, _) = ctx.register_merchant(&merchant).await;
    // Fashion merchant, Grocery category
    ctx.onboard(&merchant, "Fashion").await;

    let category_id = ctx.seed_category("Grocery").await;
    let product = ctx.seed_master_product(category_id, "Bulk Salt").await;

    let resp = merchant
        .post(ctx.url("/api/smart-add/bulk-add"))
        .json(&json!({"category_id": category_id, "product_ids": [product]}))
        .send()
        .await
        .expect("bulk add failed");

    assert_eq!(resp.status(), 400);
    let products = ctx
        .count("SELECT COUNT(*) FROM products WHERE merchant_id = $1", merchant_id)
        .await;
    assert_eq!(products, 0);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_unknown_product_in_batch_rejects_whole_batch() {
    let ctx = TestContext::new().await;
    let merchant = ctx.another_client();
    let (merchant_id, _) = ctx.register_merchant(&merchant).await;
    ctx.onboard(&merchant, "Grocery").await;

    let category_id = ctx.seed_category("Grocery").await;
    let product = ctx.seed_master_product(category_id, "Bulk Flour").await;

    // One valid id plus one that isn't in the category: nothing is written
    let resp = merchant
        .post(ctx.url("/api/smart-add/bulk-add"))
        .json(&json!({"category_id": category_id, "product_ids": [product, 0]}))
        .send()
        .await
        .expect("bulk add failed");

    assert_eq!(resp.status(), 400);
    let products = ctx
        .count("SELECT COUNT(*) FROM products WHERE merchant_id = $1", merchant_id)
        .await;
    assert_eq!(products, 0);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_smart_add_listing_hides_selected_products() {
    let ctx = TestContext::new().await;
    let merchant = ctx.another_client();
    ctx.register_merchant(&merchant).await;
    ctx.onboard(&merchant, "Grocery").await;

    let category_id = ctx.seed_category("Grocery").await;
    let first = ctx.seed_master_product(category_id, "Bulk Oats").await;
    ctx.seed_master_product(category_id, "Bulk Lentils").await;

    let resp = merchant
        .post(ctx.url("/api/smart-add/bulk-add"))
        .json(&json!({"category_id": category_id, "product_ids": [first]}))
        .send()
        .await
        .expect("bulk add failed");
    assert_eq!(resp.status(), 201);

    let resp = merchant
        .get(ctx.url(&format!("/api/smart-add/products/{category_id}")))
        .send()
        .await
        .expect("listing failed");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("listing body");
    let names: Vec<&str> = body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert!(!names.contains(&"Bulk Oats"), "selected product must be hidden");
    assert!(names.contains(&"Bulk Lentils"));
}
