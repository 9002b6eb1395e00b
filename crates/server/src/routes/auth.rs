//! Authentication route handlers.
//!
//! Registration, login, logout, and the current-merchant endpoint. Login
//! stores a [`CurrentMerchant`] in the Postgres-backed session.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use bodega_core::MerchantId;

use crate::db::MerchantRepository;
use crate::error::AppError;
use crate::middleware::{RequireMerchant, clear_current_merchant, set_current_merchant};
use crate::models::session::CurrentMerchant;
use crate::services::AuthService;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub mobile_no: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public account summary returned by auth endpoints.
#[derive(Debug, Serialize)]
pub struct MerchantSummary {
    pub id: MerchantId,
    pub email: String,
    pub full_name: String,
    pub mobile_no: String,
    pub is_verified: bool,
}

/// Response for registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub merchant: MerchantSummary,
}

/// Response for login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub merchant: MerchantSummary,
}

/// Generic message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl From<&crate::models::merchant::Merchant> for MerchantSummary {
    fn from(m: &crate::models::merchant::Merchant) -> Self {
        Self {
            id: m.id,
            email: m.email.as_str().to_owned(),
            full_name: m.full_name.clone(),
            mobile_no: m.mobile_no.as_str().to_owned(),
            is_verified: m.is_verified,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new merchant account.
///
/// POST /api/auth/register
///
/// # Errors
///
/// Returns 400 for field validation failures and 409 if the email is taken.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let auth = AuthService::new(state.pool());
    let merchant = auth
        .register(&body.email, &body.full_name, &body.mobile_no, &body.password)
        .await?;

    tracing::info!(merchant_id = %merchant.id, "merchant registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Merchant registered successfully".to_owned(),
            merchant: MerchantSummary::from(&merchant),
        }),
    ))
}

/// Log a merchant in, establishing a session.
///
/// POST /api/auth/login
///
/// # Errors
///
/// Returns 401 for bad credentials and 403 for disabled accounts.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let auth = AuthService::new(state.pool());
    let merchant = auth.login(&body.email, &body.password).await?;

    let current = CurrentMerchant {
        id: merchant.id,
        email: merchant.email.clone(),
        is_staff: merchant.is_staff,
    };
    set_current_merchant(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    tracing::info!(merchant_id = %merchant.id, "merchant logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_owned(),
        merchant: MerchantSummary::from(&merchant),
    }))
}

/// Log the current merchant out.
///
/// POST /api/auth/logout
///
/// # Errors
///
/// Returns 500 if the session cannot be cleared.
pub async fn logout(session: Session) -> Result<Json<MessageResponse>, AppError> {
    clear_current_merchant(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    // Also destroy the entire session
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    Ok(Json(MessageResponse {
        message: "Logged out".to_owned(),
    }))
}

/// The currently authenticated merchant.
///
/// GET /api/auth/me
///
/// # Errors
///
/// Returns 401 if not logged in.
pub async fn me(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
) -> Result<Json<MerchantSummary>, AppError> {
    let merchant = MerchantRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("merchant".to_owned()))?;

    Ok(Json(MerchantSummary::from(&merchant)))
}
