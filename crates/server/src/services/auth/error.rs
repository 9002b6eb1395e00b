//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] bodega_core::EmailError),

    /// Invalid mobile number format.
    #[error("invalid mobile number: {0}")]
    InvalidMobile(#[from] bodega_core::MobileNumberError),

    /// Full name missing from registration.
    #[error("full name is required")]
    MissingFullName,

    /// Invalid credentials (wrong password or merchant not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Merchant already exists.
    #[error("merchant already exists")]
    EmailTaken,

    /// Account has been deactivated.
    #[error("account is disabled")]
    AccountDisabled,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
