//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring merchant (and reviewer) authentication
//! in route handlers. Every surface is JSON, so rejections are JSON bodies,
//! never redirects.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::session::{CurrentMerchant, keys};

/// Extractor that requires a logged-in merchant.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     RequireMerchant(merchant): RequireMerchant,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", merchant.email)
/// }
/// ```
pub struct RequireMerchant(pub CurrentMerchant);

/// Extractor that requires a logged-in reviewer (`is_staff`).
pub struct RequireReviewer(pub CurrentMerchant);

/// Error returned when authentication or staff access is required.
pub enum AuthRejection {
    /// No merchant in the session.
    Unauthorized,
    /// Logged in, but not a reviewer.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "authentication required"})),
            )
                .into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({"error": "reviewer access required"})),
            )
                .into_response(),
        }
    }
}

/// Read the current merchant out of the request's session.
async fn current_merchant(parts: &mut Parts) -> Option<CurrentMerchant> {
    // Session is placed in extensions by SessionManagerLayer
    let session = parts.extensions.get::<Session>()?;

    session
        .get::<CurrentMerchant>(keys::CURRENT_MERCHANT)
        .await
        .ok()
        .flatten()
}

impl<S> FromRequestParts<S> for RequireMerchant
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let merchant = current_merchant(parts)
            .await
            .ok_or(AuthRejection::Unauthorized)?;

        Ok(Self(merchant))
    }
}

impl<S> FromRequestParts<S> for RequireReviewer
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let merchant = current_merchant(parts)
            .await
            .ok_or(AuthRejection::Unauthorized)?;

        if !merchant.is_staff {
            return Err(AuthRejection::Forbidden);
        }

        Ok(Self(merchant))
    }
}

/// Extractor that optionally gets the current merchant.
///
/// Unlike `RequireMerchant`, this does not reject the request if nobody is
/// logged in.
pub struct OptionalMerchant(pub Option<CurrentMerchant>);

impl<S> FromRequestParts<S> for OptionalMerchant
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_merchant(parts).await))
    }
}

/// Helper to set the current merchant in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_merchant(
    session: &Session,
    merchant: &CurrentMerchant,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CURRENT_MERCHANT, merchant).await
}

/// Helper to clear the current merchant from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_merchant(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session.remove::<CurrentMerchant>(keys::CURRENT_MERCHANT).await?;
    Ok(())
}
