//! Merchant onboarding profile handlers.
//!
//! A merchant completes onboarding by saving their business profile; the
//! declared business category then gates master catalog access. Profile and
//! banner images are uploaded as multipart form data into the blob store.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bodega_core::BusinessCategory;

use crate::db::MerchantRepository;
use crate::db::merchants::ProfileInput;
use crate::error::AppError;
use crate::middleware::RequireMerchant;
use crate::models::merchant::MerchantProfile;
use crate::services::assets::PROFILE_IMAGE_PREFIX;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Full profile payload (POST).
#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub business_name: String,
    pub business_category: BusinessCategory,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
}

/// Partial profile payload (PATCH).
#[derive(Debug, Deserialize)]
pub struct ProfilePatch {
    pub business_name: Option<String>,
    pub business_category: Option<BusinessCategory>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

/// Profile as returned to the merchant.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub business_name: String,
    pub business_category: BusinessCategory,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub profile_image_url: Option<String>,
    pub banner_image_url: Option<String>,
    pub is_onboarded: bool,
}

/// Response for profile save.
#[derive(Debug, Serialize)]
pub struct SaveProfileResponse {
    pub message: String,
    pub data: ProfileResponse,
}

/// Onboarding status summary.
#[derive(Debug, Serialize)]
pub struct OnboardingStatusResponse {
    pub is_onboarded: bool,
    pub full_name: String,
    pub email: String,
}

/// Profile/banner image URLs.
#[derive(Debug, Serialize)]
pub struct ProfileImagesResponse {
    pub profile_image_url: Option<String>,
    pub banner_image_url: Option<String>,
}

fn profile_response(state: &AppState, profile: &MerchantProfile) -> ProfileResponse {
    ProfileResponse {
        business_name: profile.business_name.clone(),
        business_category: profile.business_category,
        address: profile.address.clone(),
        city: profile.city.clone(),
        pincode: profile.pincode.clone(),
        latitude: profile.latitude,
        longitude: profile.longitude,
        profile_image_url: profile.profile_image.as_deref().map(|p| state.store().url(p)),
        banner_image_url: profile.banner_image.as_deref().map(|p| state.store().url(p)),
        is_onboarded: profile.is_onboarded,
    }
}

// =============================================================================
// Profile Handlers
// =============================================================================

/// Get the current merchant's profile.
///
/// GET /api/profile
///
/// # Errors
///
/// Returns 404 if the merchant has not onboarded yet.
pub async fn get_profile(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = MerchantRepository::new(state.pool())
        .get_profile(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("profile".to_owned()))?;

    Ok(Json(profile_response(&state, &profile)))
}

/// Create or replace the merchant's profile, completing onboarding.
///
/// POST /api/profile
///
/// # Errors
///
/// Returns 400 for invalid fields.
pub async fn save_profile(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
    Json(body): Json<ProfileRequest>,
) -> Result<(StatusCode, Json<SaveProfileResponse>), AppError> {
    if body.business_name.trim().is_empty() {
        return Err(AppError::validation(
            "business_name",
            "business name is required",
        ));
    }

    let profile = MerchantRepository::new(state.pool())
        .upsert_profile(
            current.id,
            ProfileInput {
                business_name: body.business_name.trim(),
                business_category: body.business_category,
                address: &body.address,
                city: &body.city,
                pincode: &body.pincode,
                latitude: body.latitude,
                longitude: body.longitude,
            },
        )
        .await?;

    tracing::info!(merchant_id = %current.id, "merchant profile saved");

    Ok((
        StatusCode::CREATED,
        Json(SaveProfileResponse {
            message: "Profile saved successfully".to_owned(),
            data: profile_response(&state, &profile),
        }),
    ))
}

/// Partially update the merchant's profile.
///
/// PATCH /api/profile
///
/// # Errors
///
/// Returns 404 if the merchant has not onboarded yet.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
    Json(body): Json<ProfilePatch>,
) -> Result<Json<SaveProfileResponse>, AppError> {
    let repo = MerchantRepository::new(state.pool());
    let existing = repo
        .get_profile(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("profile".to_owned()))?;

    let business_name = body.business_name.unwrap_or(existing.business_name);
    if business_name.trim().is_empty() {
        return Err(AppError::validation(
            "business_name",
            "business name is required",
        ));
    }

    let profile = repo
        .upsert_profile(
            current.id,
            ProfileInput {
                business_name: business_name.trim(),
                business_category: body
                    .business_category
                    .unwrap_or(existing.business_category),
                address: &body.address.unwrap_or(existing.address),
                city: &body.city.unwrap_or(existing.city),
                pincode: &body.pincode.unwrap_or(existing.pincode),
                latitude: body.latitude.unwrap_or(existing.latitude),
                longitude: body.longitude.unwrap_or(existing.longitude),
            },
        )
        .await?;

    Ok(Json(SaveProfileResponse {
        message: "Profile updated successfully".to_owned(),
        data: profile_response(&state, &profile),
    }))
}

/// Whether the merchant has completed onboarding.
///
/// GET /api/onboarding-status
///
/// # Errors
///
/// Returns 401 if not logged in.
pub async fn onboarding_status(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
) -> Result<Json<OnboardingStatusResponse>, AppError> {
    let repo = MerchantRepository::new(state.pool());
    let merchant = repo
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("merchant".to_owned()))?;
    let is_onboarded = repo
        .get_profile(current.id)
        .await?
        .is_some_and(|p| p.is_onboarded);

    Ok(Json(OnboardingStatusResponse {
        is_onboarded,
        full_name: merchant.full_name,
        email: merchant.email.into_inner(),
    }))
}

// =============================================================================
// Profile Image Handlers
// =============================================================================

/// Get the merchant's profile/banner image URLs.
///
/// GET /api/profile/images
///
/// # Errors
///
/// Returns 404 if the merchant has not onboarded yet.
pub async fn get_images(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
) -> Result<Json<ProfileImagesResponse>, AppError> {
    let profile = MerchantRepository::new(state.pool())
        .get_profile(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("profile".to_owned()))?;

    Ok(Json(ProfileImagesResponse {
        profile_image_url: profile.profile_image.as_deref().map(|p| state.store().url(p)),
        banner_image_url: profile.banner_image.as_deref().map(|p| state.store().url(p)),
    }))
}

/// Upload profile and/or banner images (multipart).
///
/// PATCH /api/profile/images
///
/// Accepts `profile_image` and `banner_image` file parts; any other field is
/// rejected. Replaced images are deleted from storage best-effort.
///
/// # Errors
///
/// Returns 400 for unknown fields and 404 if the merchant has no profile.
pub async fn update_images(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
    mut multipart: Multipart,
) -> Result<Json<ProfileImagesResponse>, AppError> {
    let repo = MerchantRepository::new(state.pool());
    let existing = repo
        .get_profile(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("profile".to_owned()))?;

    let mut new_profile_image: Option<String> = None;
    let mut new_banner_image: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation {
            field: None,
            message: format!("invalid multipart request: {e}"),
        })?
    {
        let name = field.name().unwrap_or("").to_owned();
        let kind = match name.as_str() {
            "profile_image" => "profile",
            "banner_image" => "banner",
            other => {
                return Err(AppError::Validation {
                    field: None,
                    message: format!("cannot update field \"{other}\" here"),
                });
            }
        };

        let extension = field
            .file_name()
            .and_then(|f| f.rsplit('.').next().map(str::to_owned))
            .filter(|ext| !ext.is_empty() && ext.len() <= 8);
        let bytes = field.bytes().await.map_err(|e| AppError::Validation {
            field: None,
            message: format!("failed to read upload: {e}"),
        })?;

        let filename = extension.map_or_else(
            || Uuid::new_v4().to_string(),
            |ext| format!("{}.{ext}", Uuid::new_v4()),
        );
        let path = format!("{PROFILE_IMAGE_PREFIX}/{}/{kind}/{filename}", current.id);
        state.store().write(&path, &bytes).await?;

        match kind {
            "profile" => new_profile_image = Some(path),
            _ => new_banner_image = Some(path),
        }
    }

    let profile = repo
        .set_profile_images(
            current.id,
            new_profile_image.as_deref(),
            new_banner_image.as_deref(),
        )
        .await?;

    // Remove replaced blobs; failures only warrant a log line.
    for old in [
        new_profile_image.is_some().then_some(existing.profile_image).flatten(),
        new_banner_image.is_some().then_some(existing.banner_image).flatten(),
    ]
    .into_iter()
    .flatten()
    {
        if let Err(e) = state.store().delete(&old).await {
            tracing::warn!(merchant_id = %current.id, path = %old, error = %e,
                "failed to delete replaced profile image");
        }
    }

    Ok(Json(ProfileImagesResponse {
        profile_image_url: profile.profile_image.as_deref().map(|p| state.store().url(p)),
        banner_image_url: profile.banner_image.as_deref().map(|p| state.store().url(p)),
    }))
}
