//! Merchant account and profile types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use bodega_core::{BusinessCategory, Email, MerchantId, MobileNumber};

/// A merchant account.
///
/// Reviewers are merchants with `is_staff` set; they are created by the CLI,
/// never through registration.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Merchant {
    /// Unique merchant ID.
    pub id: MerchantId,
    /// Login email (unique, lowercased).
    pub email: Email,
    /// Merchant's full name.
    pub full_name: String,
    /// Contact mobile number.
    pub mobile_no: MobileNumber,
    /// Whether the account may log in.
    pub is_active: bool,
    /// Whether the account can operate the reviewer surface.
    pub is_staff: bool,
    /// Whether the account has been verified.
    pub is_verified: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A merchant's business profile, created at onboarding.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MerchantProfile {
    /// Owning merchant.
    pub merchant_id: MerchantId,
    /// Storefront display name.
    pub business_name: String,
    /// Declared business category; gates master catalog access.
    pub business_category: BusinessCategory,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// Postal code.
    pub pincode: String,
    /// Latitude of the storefront.
    pub latitude: Decimal,
    /// Longitude of the storefront.
    pub longitude: Decimal,
    /// Profile image blob reference.
    pub profile_image: Option<String>,
    /// Banner image blob reference.
    pub banner_image: Option<String>,
    /// Set once the first profile save completes.
    pub is_onboarded: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
