//! Integration tests for the merchant-facing surface: registration,
//! submission validation, and notifications.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p bodega-server)
//!
//! Run with: cargo test -p bodega-integration-tests -- --ignored

use serde_json::{Value, json};

use bodega_integration_tests::{TestContext, unique_email};

// ============================================================================
// Registration & Session Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_register_login_me_roundtrip() {
    let ctx = TestContext::new().await;
    let client = ctx.another_client();
    let (_, email) = ctx.register_merchant(&client).await;

    let resp = client
        .get(ctx.url("/api/auth/me"))
        .send()
        .await
        .expect("me request failed");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("me body");
    assert_eq!(body["email"], email);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_duplicate_registration_conflicts() {
    let ctx = TestContext::new().await;
    let email = unique_email();
    let payload = json!({
        "email": email,
        "full_name": "Test Merchant",
        "mobile_no": "+14155550123",
        "password": "sturdy-passphrase-9",
    });

    let client = ctx.another_client();
    let first = client
        .post(ctx.url("/api/auth/register"))
        .json(&payload)
        .send()
        .await
        .expect("first register failed");
    assert_eq!(first.status(), 201);

    let second = client
        .post(ctx.url("/api/auth/register"))
        .json(&payload)
        .send()
        .await
        .expect("second register failed");
    assert_eq!(second.status(), 409);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_protected_routes_require_session() {
    let ctx = TestContext::new().await;
    let anonymous = ctx.another_client();

    let resp = anonymous
        .get(ctx.url("/api/products"))
        .send()
        .await
        .expect("products request failed");
    assert_eq!(resp.status(), 401);
}

// ============================================================================
// Submission Validation Tests
// ============================================================================

async fn submit_with_prices(
    ctx: &TestContext,
    client: &reqwest::Client,
    original: &str,
    discount: &str,
) -> reqwest::Response {
    let form = reqwest::multipart::Form::new()
        .text("name", "Priced Widget")
        .text("stock", "3")
        .text("original_price", original.to_owned())
        .text("discount_price", discount.to_owned());

    client
        .post(ctx.url("/api/products"))
        .multipart(form)
        .send()
        .await
        .expect("submission failed")
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_discount_exceeding_original_rejected() {
    let ctx = TestContext::new().await;
    let client = ctx.another_client();
    ctx.register_merchant(&client).await;

    let resp = submit_with_prices(&ctx, &client, "100", "150").await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("error body");
    assert_eq!(body["field"], "discount_price");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_zero_original_price_rejected() {
    let ctx = TestContext::new().await;
    let client = ctx.another_client();
    ctx.register_merchant(&client).await;

    let resp = submit_with_prices(&ctx, &client, "0", "0").await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("error body");
    assert_eq!(body["field"], "original_price");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_valid_discount_accepted() {
    let ctx = TestContext::new().await;
    let client = ctx.another_client();
    ctx.register_merchant(&client).await;

    let resp = submit_with_prices(&ctx, &client, "100", "90").await;
    assert_eq!(resp.status(), 202);
}

// ============================================================================
// Notification Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_notification_read_flow() {
    let ctx = TestContext::new().await;
    let client = ctx.another_client();
    let (merchant_id, _) = ctx.register_merchant(&client).await;

    // Two direct notifications for this merchant
    for message in ["first message", "second message"] {
        sqlx::query("INSERT INTO notifications (recipient_id, message) VALUES ($1, $2)")
            .bind(merchant_id)
            .bind(message)
            .execute(&ctx.pool)
            .await
            .expect("failed to insert notification");
    }

    let resp = client
        .get(ctx.url("/api/notifications/unread-count"))
        .send()
        .await
        .expect("unread count failed");
    let body: Value = resp.json().await.expect("unread body");
    assert_eq!(body["unread_count"], 2);

    let resp = client
        .get(ctx.url("/api/notifications"))
        .send()
        .await
        .expect("list failed");
    let list: Value = resp.json().await.expect("list body");
    let first_id = list[0]["id"].as_i64().expect("notification id");

    let resp = client
        .post(ctx.url(&format!("/api/notifications/{first_id}/read")))
        .send()
        .await
        .expect("mark read failed");
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(ctx.url("/api/notifications/unread-count"))
        .send()
        .await
        .expect("unread count failed");
    let body: Value = resp.json().await.expect("unread body");
    assert_eq!(body["unread_count"], 1);

    let resp = client
        .post(ctx.url("/api/notifications/read-all"))
        .send()
        .await
        .expect("read-all failed");
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(ctx.url("/api/notifications/unread-count"))
        .send()
        .await
        .expect("unread count failed");
    let body: Value = resp.json().await.expect("unread body");
    assert_eq!(body["unread_count"], 0);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_cannot_read_another_merchants_notification() {
    let ctx = TestContext::new().await;
    let owner = ctx.another_client();
    let (owner_id, _) = ctx.register_merchant(&owner).await;

    sqlx::query("INSERT INTO notifications (recipient_id, message) VALUES ($1, 'private')")
        .bind(owner_id)
        .execute(&ctx.pool)
        .await
        .expect("failed to insert notification");

    let resp = owner
        .get(ctx.url("/api/notifications"))
        .send()
        .await
        .expect("list failed");
    let list: Value = resp.json().await.expect("list body");
    let id = list[0]["id"].as_i64().expect("notification id");

    // A different merchant cannot mark it read
    let intruder = ctx.another_client();
    ctx.register_merchant(&intruder).await;
    let resp = intruder
        .post(ctx.url(&format!("/api/notifications/{id}/read")))
        .send()
        .await
        .expect("mark read failed");
    assert_eq!(resp.status(), 404);
}
