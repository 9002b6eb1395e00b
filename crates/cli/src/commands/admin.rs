//! Reviewer account management commands.
//!
//! # Usage
//!
//! ```bash
//! bodega-cli admin create -e reviewer@example.com -n "Review Team" \
//!     -m +14155550123 -p <password>
//! ```
//!
//! # Environment Variables
//!
//! - `BODEGA_DATABASE_URL` - `PostgreSQL` connection string

use secrecy::SecretString;
use thiserror::Error;

use bodega_core::{Email, MerchantId, MobileNumber};
use bodega_server::db::merchants::{MerchantRepository, NewMerchant};
use bodega_server::db::{self, RepositoryError};
use bodega_server::services::auth;

/// Errors that can occur during reviewer management.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] bodega_core::EmailError),

    /// Invalid mobile number.
    #[error("Invalid mobile number: {0}")]
    InvalidMobile(#[from] bodega_core::MobileNumberError),

    /// Password failed validation or hashing.
    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    /// Account already exists.
    #[error("Account already exists with email: {0}")]
    AccountExists(String),

    /// Repository failure.
    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

/// Create a reviewer account (`is_staff`).
///
/// # Returns
///
/// The ID of the created account.
///
/// # Errors
///
/// Returns `AdminError` if a field is invalid, the email is taken, or the
/// database is unreachable.
pub async fn create_reviewer(
    email: &str,
    name: &str,
    mobile: &str,
    password: &str,
) -> Result<MerchantId, AdminError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email)?;
    let mobile = MobileNumber::parse(mobile)?;

    auth::validate_password(password).map_err(|e| AdminError::InvalidPassword(e.to_string()))?;
    let password_hash =
        auth::hash_password(password).map_err(|e| AdminError::InvalidPassword(e.to_string()))?;

    let database_url = std::env::var("BODEGA_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| AdminError::MissingEnvVar("BODEGA_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Creating reviewer account: {email}");

    let merchant = MerchantRepository::new(&pool)
        .create(NewMerchant {
            email: &email,
            full_name: name,
            mobile_no: &mobile,
            password_hash: &password_hash,
            is_staff: true,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::AccountExists(email.to_string()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!(
        "Reviewer account created! ID: {}, Email: {}",
        merchant.id,
        merchant.email
    );

    Ok(merchant.id)
}
