//! Integration tests for Bodega.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL, run migrations, start the server
//! cargo run -p bodega-cli -- migrate
//! cargo run -p bodega-server
//!
//! # Run integration tests
//! cargo test -p bodega-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `BODEGA_BASE_URL` - Server base URL (default: http://localhost:8000)
//! - `BODEGA_DATABASE_URL` - `PostgreSQL` connection string, used for direct
//!   row assertions and test fixtures
//!
//! Every test creates its own merchants with unique emails, so tests can run
//! against a shared database without interfering with each other.

use reqwest::Client;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

/// Shared context for one test: an HTTP client with a cookie store, the
/// server base URL, and a direct database pool.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to the server and database named by the environment.
    ///
    /// # Panics
    ///
    /// Panics if `BODEGA_DATABASE_URL` is unset or unreachable.
    pub async fn new() -> Self {
        let base_url = std::env::var("BODEGA_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        let database_url =
            std::env::var("BODEGA_DATABASE_URL").expect("BODEGA_DATABASE_URL must be set");

        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to database");

        Self {
            client: cookie_client(),
            base_url,
            pool,
        }
    }

    /// A second, independent session against the same server.
    #[must_use]
    pub fn another_client(&self) -> Client {
        cookie_client()
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Register and log in a fresh merchant; returns (merchant id, email).
    pub async fn register_merchant(&self, client: &Client) -> (i32, String) {
        let email = unique_email();
        let resp = client
            .post(self.url("/api/auth/register"))
            .json(&json!({
                "email": email,
                "full_name": "Test Merchant",
                "mobile_no": "+14155550123",
                "password": "sturdy-passphrase-9",
            }))
            .send()
            .await
            .expect("register request failed");
        assert_eq!(resp.status(), 201, "registration should succeed");
        let body: Value = resp.json().await.expect("register body");
        let id = body["merchant"]["id"].as_i64().expect("merchant id") as i32;

        self.login(client, &email).await;
        (id, email)
    }

    /// Log an existing account in on `client`.
    pub async fn login(&self, client: &Client, email: &str) {
        let resp = client
            .post(self.url("/api/auth/login"))
            .json(&json!({"email": email, "password": "sturdy-passphrase-9"}))
            .send()
            .await
            .expect("login request failed");
        assert_eq!(resp.status(), 200, "login should succeed");
    }

    /// Complete onboarding for the logged-in merchant.
    pub async fn onboard(&self, client: &Client, business_category: &str) {
        let resp = client
            .post(self.url("/api/profile"))
            .json(&json!({
                "business_name": "Corner Shop",
                "business_category": business_category,
                "address": "12 Market Lane",
                "city": "Springfield",
                "pincode": "560001",
                "latitude": "12.971599",
                "longitude": "77.594566",
            }))
            .send()
            .await
            .expect("profile request failed");
        assert_eq!(resp.status(), 201, "onboarding should succeed");
    }

    /// Register a merchant, promote it to reviewer, and log in on a fresh
    /// client. Returns the reviewer session.
    pub async fn reviewer_session(&self) -> Client {
        let client = self.another_client();
        let (id, email) = self.register_merchant(&client).await;

        sqlx::query("UPDATE merchants SET is_staff = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .expect("failed to promote reviewer");

        // Re-login so the session carries the staff flag
        let client = self.another_client();
        self.login(&client, &email).await;
        client
    }

    /// Submit a product for review via the merchant surface; returns the
    /// pending product id.
    pub async fn submit_product(&self, client: &Client, name: &str) -> i32 {
        let form = reqwest::multipart::Form::new()
            .text("name", name.to_owned())
            .text("description", "integration test submission")
            .text("stock", "5")
            .text("original_price", "100.00")
            .text("discount_price", "90.00");

        let resp = client
            .post(self.url("/api/products"))
            .multipart(form)
            .send()
            .await
            .expect("submission request failed");
        assert_eq!(resp.status(), 202, "submission should be accepted");
        let body: Value = resp.json().await.expect("submission body");
        body["pending_product_id"].as_i64().expect("pending id") as i32
    }

    /// Insert a master category directly; returns its id.
    pub async fn seed_category(&self, business_category: &str) -> i32 {
        let name = format!("Category {}", Uuid::new_v4());
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO master_categories (name, business_category)
             VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(business_category)
        .fetch_one(&self.pool)
        .await
        .expect("failed to seed category")
    }

    /// Insert a master product directly; returns its id.
    pub async fn seed_master_product(&self, category_id: i32, name: &str) -> i32 {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO master_products (name, description, category_id)
             VALUES ($1, 'seeded', $2) RETURNING id",
        )
        .bind(name)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .expect("failed to seed master product")
    }

    /// Count rows matching a single-bind query, for direct assertions.
    pub async fn count(&self, sql: &str, bind: i32) -> i64 {
        sqlx::query_scalar::<_, i64>(sql)
            .bind(bind)
            .fetch_one(&self.pool)
            .await
            .expect("count query failed")
    }
}

fn cookie_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique email per test account.
#[must_use]
pub fn unique_email() -> String {
    format!("merchant-{}@test.example", Uuid::new_v4())
}
