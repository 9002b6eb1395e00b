//! Merchant repository for database operations.
//!
//! Covers accounts (registration, login lookup) and onboarding profiles.

use rust_decimal::Decimal;
use sqlx::PgPool;

use bodega_core::{BusinessCategory, Email, MerchantId, MobileNumber};

use super::RepositoryError;
use crate::models::merchant::{Merchant, MerchantProfile};

const MERCHANT_COLUMNS: &str = "id, email, full_name, mobile_no, is_active, is_staff, \
     is_verified, created_at, updated_at";

/// Parameters for creating a merchant account.
pub struct NewMerchant<'a> {
    pub email: &'a Email,
    pub full_name: &'a str,
    pub mobile_no: &'a MobileNumber,
    pub password_hash: &'a str,
    /// Reviewer accounts are created by the CLI only.
    pub is_staff: bool,
}

/// Profile fields saved at onboarding.
pub struct ProfileInput<'a> {
    pub business_name: &'a str,
    pub business_category: BusinessCategory,
    pub address: &'a str,
    pub city: &'a str,
    pub pincode: &'a str,
    pub latitude: Decimal,
    pub longitude: Decimal,
}

/// Repository for merchant database operations.
pub struct MerchantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MerchantRepository<'a> {
    /// Create a new merchant repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new merchant account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, params: NewMerchant<'_>) -> Result<Merchant, RepositoryError> {
        sqlx::query_as::<_, Merchant>(&format!(
            "INSERT INTO merchants (email, full_name, mobile_no, password_hash, is_staff)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {MERCHANT_COLUMNS}"
        ))
        .bind(params.email)
        .bind(params.full_name)
        .bind(params.mobile_no)
        .bind(params.password_hash)
        .bind(params.is_staff)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "email already exists"))
    }

    /// Get a merchant by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Merchant>, RepositoryError> {
        let merchant = sqlx::query_as::<_, Merchant>(&format!(
            "SELECT {MERCHANT_COLUMNS} FROM merchants WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(merchant)
    }

    /// Get a merchant by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: MerchantId) -> Result<Option<Merchant>, RepositoryError> {
        let merchant = sqlx::query_as::<_, Merchant>(&format!(
            "SELECT {MERCHANT_COLUMNS} FROM merchants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(merchant)
    }

    /// Get a merchant and their password hash by email.
    ///
    /// Returns `None` if no account exists for the email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Merchant, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct MerchantWithHash {
            #[sqlx(flatten)]
            merchant: Merchant,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, MerchantWithHash>(&format!(
            "SELECT {MERCHANT_COLUMNS}, password_hash FROM merchants WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| (r.merchant, r.password_hash)))
    }

    /// Get a merchant's onboarding profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_profile(
        &self,
        merchant_id: MerchantId,
    ) -> Result<Option<MerchantProfile>, RepositoryError> {
        let profile = sqlx::query_as::<_, MerchantProfile>(
            "SELECT merchant_id, business_name, business_category, address, city, pincode,
                    latitude, longitude, profile_image, banner_image, is_onboarded,
                    created_at, updated_at
             FROM merchant_profiles
             WHERE merchant_id = $1",
        )
        .bind(merchant_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }

    /// Create or replace a merchant's profile, marking them onboarded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn upsert_profile(
        &self,
        merchant_id: MerchantId,
        input: ProfileInput<'_>,
    ) -> Result<MerchantProfile, RepositoryError> {
        let profile = sqlx::query_as::<_, MerchantProfile>(
            "INSERT INTO merchant_profiles
                 (merchant_id, business_name, business_category, address, city, pincode,
                  latitude, longitude, is_onboarded)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE)
             ON CONFLICT (merchant_id) DO UPDATE SET
                 business_name = EXCLUDED.business_name,
                 business_category = EXCLUDED.business_category,
                 address = EXCLUDED.address,
                 city = EXCLUDED.city,
                 pincode = EXCLUDED.pincode,
                 latitude = EXCLUDED.latitude,
                 longitude = EXCLUDED.longitude,
                 is_onboarded = TRUE,
                 updated_at = NOW()
             RETURNING merchant_id, business_name, business_category, address, city, pincode,
                       latitude, longitude, profile_image, banner_image, is_onboarded,
                       created_at, updated_at",
        )
        .bind(merchant_id)
        .bind(input.business_name)
        .bind(input.business_category)
        .bind(input.address)
        .bind(input.city)
        .bind(input.pincode)
        .bind(input.latitude)
        .bind(input.longitude)
        .fetch_one(self.pool)
        .await?;

        Ok(profile)
    }

    /// Update profile and/or banner image references.
    ///
    /// Fields passed as `None` are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the merchant has no profile.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_profile_images(
        &self,
        merchant_id: MerchantId,
        profile_image: Option<&str>,
        banner_image: Option<&str>,
    ) -> Result<MerchantProfile, RepositoryError> {
        let profile = sqlx::query_as::<_, MerchantProfile>(
            "UPDATE merchant_profiles
             SET profile_image = COALESCE($2, profile_image),
                 banner_image = COALESCE($3, banner_image),
                 updated_at = NOW()
             WHERE merchant_id = $1
             RETURNING merchant_id, business_name, business_category, address, city, pincode,
                       latitude, longitude, profile_image, banner_image, is_onboarded,
                       created_at, updated_at",
        )
        .bind(merchant_id)
        .bind(profile_image)
        .bind(banner_image)
        .fetch_optional(self.pool)
        .await?;

        profile.ok_or(RepositoryError::NotFound)
    }
}
