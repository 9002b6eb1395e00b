//! Master catalog types shared across merchants.

use chrono::{DateTime, Utc};

use bodega_core::{BusinessCategory, MasterCategoryId, MasterProductId, MerchantId, SelectionId};

/// A named catalog grouping, tagged with one business category.
///
/// A merchant may only use categories whose business category matches their
/// declared one.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MasterCategory {
    pub id: MasterCategoryId,
    /// Unique category name.
    pub name: String,
    /// Which storefront type this category applies to.
    pub business_category: BusinessCategory,
}

/// A shared catalog template merchants can copy into their inventory.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MasterProduct {
    pub id: MasterProductId,
    pub name: String,
    pub brand: Option<String>,
    pub description: String,
    /// Shared image blob reference; copied (never moved) to merchant products.
    pub image: Option<String>,
    pub category_id: Option<MasterCategoryId>,
}

/// Records that a merchant has adopted a master product.
///
/// Unique per (merchant, master product); backs duplicate-add rejection.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SmartAddSelection {
    pub id: SelectionId,
    pub merchant_id: MerchantId,
    pub master_product_id: MasterProductId,
    pub added_at: DateTime<Utc>,
}
