//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-tier errors to
//! Sentry before responding. All route handlers return `Result<T, AppError>`;
//! the response body is JSON (`{"error": ..., "field": ...}`) and internal
//! details are never exposed on 5xx responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::approval::ApprovalError;
use crate::services::auth::AuthError;
use crate::services::smart_add::SmartAddError;
use crate::storage::StorageError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Blob storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Approval state machine rejected or failed the operation.
    #[error("Approval error: {0}")]
    Approval(#[from] ApprovalError),

    /// Smart-add batch rejected or failed.
    #[error("Smart add error: {0}")]
    SmartAdd(#[from] SmartAddError),

    /// A request field failed validation.
    #[error("Validation error: {message}")]
    Validation {
        field: Option<&'static str>,
        message: String,
    },

    /// The request conflicts with existing state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Merchant is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Merchant lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a field-level validation error.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field),
            message: message.into(),
        }
    }

    /// Whether this error is in the server tier (worth capturing to Sentry).
    fn is_server_error(&self) -> bool {
        match self {
            Self::Database(_) | Self::Storage(_) | Self::Internal(_) => true,
            Self::Auth(err) => matches!(err, AuthError::Repository(_) | AuthError::PasswordHash),
            Self::Approval(err) => matches!(err, ApprovalError::Repository(_)),
            Self::SmartAdd(err) => matches!(err, SmartAddError::Repository(_)),
            _ => false,
        }
    }
}

impl From<bodega_core::PricingError> for AppError {
    fn from(e: bodega_core::PricingError) -> Self {
        Self::Validation {
            field: Some(e.field()),
            message: e.to_string(),
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Storage(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::AccountDisabled => StatusCode::FORBIDDEN,
                AuthError::InvalidEmail(_)
                | AuthError::InvalidMobile(_)
                | AuthError::MissingFullName
                | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Approval(err) => match err {
                ApprovalError::MissingCategory | ApprovalError::UnknownCategory => {
                    StatusCode::BAD_REQUEST
                }
                ApprovalError::AlreadyApproved => StatusCode::CONFLICT,
                ApprovalError::NotFound => StatusCode::NOT_FOUND,
                ApprovalError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::SmartAdd(err) => match err {
                SmartAddError::NotOnboarded
                | SmartAddError::InvalidCategory
                | SmartAddError::NotInCategory(_)
                | SmartAddError::EmptySelection => StatusCode::BAD_REQUEST,
                SmartAddError::AlreadyAdded(_) => StatusCode::CONFLICT,
                SmartAddError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        };

        // Don't expose internal error details to clients
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            match &self {
                Self::Auth(err) => err.to_string(),
                Self::Approval(err) => err.to_string(),
                Self::SmartAdd(err) => err.to_string(),
                Self::Validation { message, .. } => message.clone(),
                other => other.to_string(),
            }
        };

        let field = match &self {
            Self::Validation { field, .. } => *field,
            Self::Approval(ApprovalError::MissingCategory | ApprovalError::UnknownCategory) => {
                Some("category")
            }
            _ => None,
        };

        let body = ErrorBody {
            error: message,
            field,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::validation("discount_price", "too high");
        assert_eq!(err.to_string(), "Validation error: too high");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::validation("stock", "bad")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Conflict("dup".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_approval_errors_map_to_client_codes() {
        assert_eq!(
            get_status(AppError::Approval(ApprovalError::MissingCategory)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Approval(ApprovalError::AlreadyApproved)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Approval(ApprovalError::NotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_smart_add_errors_map_to_client_codes() {
        assert_eq!(
            get_status(AppError::SmartAdd(SmartAddError::InvalidCategory)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::SmartAdd(SmartAddError::AlreadyAdded(vec![2]))),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_pricing_error_carries_field() {
        let err: AppError =
            bodega_core::Pricing::new(rust_decimal::Decimal::ZERO, None).unwrap_err().into();
        assert!(matches!(
            err,
            AppError::Validation {
                field: Some("original_price"),
                ..
            }
        ));
    }
}
