//! Live products and pending submissions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use bodega_core::{
    MasterCategoryId, MasterProductId, MerchantId, PendingProductId, ProductId,
};

/// A live catalog entry owned by a merchant.
///
/// Created by approval of a [`PendingProduct`] or by a smart-add copy of a
/// master product; never transitions back to pending.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Owning merchant.
    pub merchant_id: MerchantId,
    /// Master product this was copied from, if any.
    pub master_product_id: Option<MasterProductId>,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Units in stock.
    pub stock: i32,
    /// Original (list) price.
    pub original_price: Decimal,
    /// Discounted price, if offered.
    pub discount_price: Option<Decimal>,
    /// Image blob reference.
    pub image: Option<String>,
    /// Catalog category.
    pub category_id: Option<MasterCategoryId>,
    /// When the product went live.
    pub created_at: DateTime<Utc>,
}

/// A merchant submission awaiting review.
///
/// Only a reviewer may mutate one (category assignment, notes); it is
/// destroyed upon approval (converted into a [`Product`]) or rejection.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PendingProduct {
    /// Unique pending-product ID.
    pub id: PendingProductId,
    /// Submitting merchant.
    pub merchant_id: MerchantId,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Units in stock.
    pub stock: i32,
    /// Original (list) price; must be positive.
    pub original_price: Decimal,
    /// Discounted price; must not exceed the original.
    pub discount_price: Option<Decimal>,
    /// Image blob reference.
    pub image: Option<String>,
    /// Category, set by the reviewer (not the submitter).
    pub category_id: Option<MasterCategoryId>,
    /// Mid-transition approval flag.
    pub is_approved: bool,
    /// Reviewer notes.
    pub review_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A pending submission joined with its submitter, for the reviewer list.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PendingReview {
    pub id: PendingProductId,
    pub merchant_id: MerchantId,
    /// Submitter's login email, for reviewer context.
    pub merchant_email: String,
    pub name: String,
    pub description: String,
    pub stock: i32,
    pub original_price: Decimal,
    pub discount_price: Option<Decimal>,
    pub image: Option<String>,
    pub category_id: Option<MasterCategoryId>,
    pub is_approved: bool,
    pub review_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
