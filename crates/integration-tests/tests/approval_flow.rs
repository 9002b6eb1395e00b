//! Integration tests for the pending-product approval workflow.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p bodega-server)
//!
//! Run with: cargo test -p bodega-integration-tests -- --ignored

use serde_json::{Value, json};

use bodega_integration_tests::TestContext;

// ============================================================================
// Approval Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_approve_without_category_fails_and_leaves_pending() {
    let ctx = TestContext::new().await;
    let merchant = ctx.another_client();
    ctx.register_merchant(&merchant).await;
    let pending_id = ctx.submit_product(&merchant, "Uncategorized Widget").await;

    let reviewer = ctx.reviewer_session().await;
    let resp = reviewer
        .post(ctx.url(&format!("/api/admin/pending-products/{pending_id}/approve")))
        .json(&json!({}))
        .send()
        .await
        .expect("approve request failed");

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("error body");
    assert_eq!(body["field"], "category");

    // The submission is untouched: still present, still unapproved
    let remaining = ctx
        .count(
            "SELECT COUNT(*) FROM pending_products WHERE id = $1 AND NOT is_approved",
            pending_id,
        )
        .await;
    assert_eq!(remaining, 1);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_approve_creates_product_notification_and_deletes_pending() {
    let ctx = TestContext::new().await;
    let merchant = ctx.another_client();
    let (merchant_id, _) = ctx.register_merchant(&merchant).await;
    let pending_id = ctx.submit_product(&merchant, "Approvable Widget").await;
    let category_id = ctx.seed_category("Grocery").await;

    let reviewer = ctx.reviewer_session().await;
    let resp = reviewer
        .post(ctx.url(&format!("/api/admin/pending-products/{pending_id}/approve")))
        .json(&json!({"category_id": category_id, "review_notes": "looks good"}))
        .send()
        .await
        .expect("approve request failed");

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("approve body");
    let product_id = body["approved_product_id"].as_i64().expect("product id") as i32;

    // Exactly one live product, carrying the submission's fields
    let products = ctx
        .count("SELECT COUNT(*) FROM products WHERE id = $1", product_id)
        .await;
    assert_eq!(products, 1);

    // The pending row is gone
    let remaining = ctx
        .count("SELECT COUNT(*) FROM pending_products WHERE id = $1", pending_id)
        .await;
    assert_eq!(remaining, 0);

    // Exactly one notification for the merchant, referencing the product
    let notifications = ctx
        .count(
            "SELECT COUNT(*) FROM notifications WHERE product_id = $1",
            product_id,
        )
        .await;
    assert_eq!(notifications, 1);
    let for_merchant = ctx
        .count(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND NOT is_read",
            merchant_id,
        )
        .await;
    assert_eq!(for_merchant, 1);

    // A second approval attempt finds nothing to approve
    let resp = reviewer
        .post(ctx.url(&format!("/api/admin/pending-products/{pending_id}/approve")))
        .json(&json!({"category_id": category_id}))
        .send()
        .await
        .expect("second approve request failed");
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_reject_notifies_and_discards_without_product() {
    let ctx = TestContext::new().await;
    let merchant = ctx.another_client();
    let (merchant_id, _) = ctx.register_merchant(&merchant).await;
    let pending_id = ctx.submit_product(&merchant, "Rejectable Widget").await;

    let reviewer = ctx.reviewer_session().await;
    let resp = reviewer
        .post(ctx.url(&format!("/api/admin/pending-products/{pending_id}/reject")))
        .json(&json!({"review_notes": "image too blurry"}))
        .send()
        .await
        .expect("reject request failed");

    assert_eq!(resp.status(), 200);

    // No product was created for this merchant
    let products = ctx
        .count("SELECT COUNT(*) FROM products WHERE merchant_id = $1", merchant_id)
        .await;
    assert_eq!(products, 0);

    // The pending row is gone
    let remaining = ctx
        .count("SELECT COUNT(*) FROM pending_products WHERE id = $1", pending_id)
        .await;
    assert_eq!(remaining, 0);

    // Exactly one notification, with no product reference
    let notifications = ctx
        .count(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND product_id IS NULL",
            merchant_id,
        )
        .await;
    assert_eq!(notifications, 1);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_concurrent_approvals_only_one_succeeds() {
    let ctx = TestContext::new().await;
    let merchant = ctx.another_client();
    ctx.register_merchant(&merchant).await;
    let pending_id = ctx.submit_product(&merchant, "Contended Widget").await;
    let category_id = ctx.seed_category("Grocery").await;

    let reviewer_a = ctx.reviewer_session().await;
    let reviewer_b = ctx.reviewer_session().await;

    let url = ctx.url(&format!("/api/admin/pending-products/{pending_id}/approve"));
    let body = json!({"category_id": category_id});

    let (a, b) = tokio::join!(
        reviewer_a.post(&url).json(&body).send(),
        reviewer_b.post(&url).json(&body).send(),
    );
    let a = a.expect("first approve failed to send");
    let b = b.expect("second approve failed to send");

    let successes = [a.status(), b.status()]
        .iter()
        .filter(|s| s.is_success())
        .count();
    assert_eq!(successes, 1, "exactly one concurrent approval must win");

    // The loser observed a clean precondition failure, not a server error
    let loser = if a.status().is_success() { b } else { a };
    assert!(
        loser.status() == 404 || loser.status() == 409,
        "loser should see not-found or already-approved, got {}",
        loser.status()
    );
}

// ============================================================================
// Batch Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_batch_approve_processes_entries_independently() {
    let ctx = TestContext::new().await;
    let merchant = ctx.another_client();
    ctx.register_merchant(&merchant).await;
    let good = ctx.submit_product(&merchant, "Batch Widget A").await;
    let category_id = ctx.seed_category("Grocery").await;

    let reviewer = ctx.reviewer_session().await;
    // One real id and one that doesn't exist: the bogus entry must not block
    // the real one.
    let resp = reviewer
        .post(ctx.url("/api/admin/pending-products/approve-batch"))
        .json(&json!({"ids": [good, 0], "category_id": category_id}))
        .send()
        .await
        .expect("batch approve failed");

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("batch body");
    assert_eq!(body["succeeded"], 1);
    assert_eq!(body["failed"], 1);

    let remaining = ctx
        .count("SELECT COUNT(*) FROM pending_products WHERE id = $1", good)
        .await;
    assert_eq!(remaining, 0);
}

// ============================================================================
// Access Control Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_reviewer_surface_rejects_plain_merchants() {
    let ctx = TestContext::new().await;
    let merchant = ctx.another_client();
    ctx.register_merchant(&merchant).await;

    let resp = merchant
        .get(ctx.url("/api/admin/pending-products"))
        .send()
        .await
        .expect("list request failed");

    assert_eq!(resp.status(), 403);
}
