//! Database operations for the Bodega `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `merchants` / `merchant_profiles` - Accounts and onboarding profiles
//! - `tower_sessions.session` - Tower-sessions storage
//! - `master_categories` / `master_products` - Shared catalog
//! - `smart_add_selections` - Merchant x master-product adoption records
//! - `products` - Live merchant inventory
//! - `pending_products` - Submissions awaiting review
//! - `notifications` - One-way merchant messages
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p bodega-cli -- migrate
//! ```
//!
//! Queries use the runtime-checked `sqlx::query_as::<_, T>` form with
//! `FromRow` row types, so the workspace builds without a live database.

pub mod catalog;
pub mod merchants;
pub mod notifications;
pub mod pending_products;
pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use merchants::MerchantRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error to [`RepositoryError::Conflict`] when it is a unique
    /// violation, passing `message` through as the conflict detail.
    pub(crate) fn from_unique_violation(e: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(message.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
