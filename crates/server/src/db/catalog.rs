//! Database operations for the master catalog and smart-add selections.

use sqlx::{PgConnection, PgExecutor, PgPool};

use bodega_core::{BusinessCategory, MasterCategoryId, MasterProductId, MerchantId};

use super::RepositoryError;
use crate::models::catalog::{MasterCategory, MasterProduct, SmartAddSelection};

const CATEGORY_COLUMNS: &str = "id, name, business_category";
const PRODUCT_COLUMNS: &str = "id, name, brand, description, image, category_id";

/// List master categories for one business category.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn list_categories_for(
    pool: &PgPool,
    business_category: BusinessCategory,
) -> Result<Vec<MasterCategory>, RepositoryError> {
    let categories = sqlx::query_as::<_, MasterCategory>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM master_categories
         WHERE business_category = $1
         ORDER BY name"
    ))
    .bind(business_category)
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

/// Get a master category by ID.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get_category(
    executor: impl PgExecutor<'_>,
    id: MasterCategoryId,
) -> Result<Option<MasterCategory>, RepositoryError> {
    let category = sqlx::query_as::<_, MasterCategory>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM master_categories WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(category)
}

/// Get a category by name, creating it with the given business category if
/// it does not exist. Used by catalog seeding.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get_or_create_category(
    pool: &PgPool,
    name: &str,
    business_category: BusinessCategory,
) -> Result<MasterCategory, RepositoryError> {
    // Existing categories keep their business category; only the name matches.
    let category = sqlx::query_as::<_, MasterCategory>(&format!(
        "INSERT INTO master_categories (name, business_category)
         VALUES ($1, $2)
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
         RETURNING {CATEGORY_COLUMNS}"
    ))
    .bind(name)
    .bind(business_category)
    .fetch_one(pool)
    .await?;

    Ok(category)
}

/// List all master products in a category.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn list_products_in_category(
    pool: &PgPool,
    category_id: MasterCategoryId,
) -> Result<Vec<MasterProduct>, RepositoryError> {
    let products = sqlx::query_as::<_, MasterProduct>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM master_products
         WHERE category_id = $1
         ORDER BY name"
    ))
    .bind(category_id)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

/// List master products in a category that the merchant has not yet selected.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn list_unselected_products(
    pool: &PgPool,
    category_id: MasterCategoryId,
    merchant_id: MerchantId,
) -> Result<Vec<MasterProduct>, RepositoryError> {
    let products = sqlx::query_as::<_, MasterProduct>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM master_products mp
         WHERE mp.category_id = $1
           AND NOT EXISTS (
               SELECT 1 FROM smart_add_selections s
               WHERE s.master_product_id = mp.id AND s.merchant_id = $2
           )
         ORDER BY mp.name"
    ))
    .bind(category_id)
    .bind(merchant_id)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

/// Fetch the master products among `ids` that belong to `category_id`.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get_products_by_ids_in_category(
    pool: &PgPool,
    ids: &[i32],
    category_id: MasterCategoryId,
) -> Result<Vec<MasterProduct>, RepositoryError> {
    let products = sqlx::query_as::<_, MasterProduct>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM master_products
         WHERE id = ANY($1) AND category_id = $2
         ORDER BY id"
    ))
    .bind(ids)
    .bind(category_id)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

/// Whether a master product with the same name/brand/category already exists.
/// Used by catalog seeding to skip duplicates.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn master_product_exists(
    pool: &PgPool,
    name: &str,
    brand: Option<&str>,
    category_id: MasterCategoryId,
) -> Result<bool, RepositoryError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (
             SELECT 1 FROM master_products
             WHERE name = $1 AND brand IS NOT DISTINCT FROM $2 AND category_id = $3
         )",
    )
    .bind(name)
    .bind(brand)
    .bind(category_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Create a master product. Used by catalog seeding.
///
/// # Errors
///
/// Returns error if the database insert fails.
pub async fn create_master_product(
    pool: &PgPool,
    name: &str,
    brand: Option<&str>,
    description: &str,
    image: Option<&str>,
    category_id: MasterCategoryId,
) -> Result<MasterProduct, RepositoryError> {
    let product = sqlx::query_as::<_, MasterProduct>(&format!(
        "INSERT INTO master_products (name, brand, description, image, category_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(name)
    .bind(brand)
    .bind(description)
    .bind(image)
    .bind(category_id)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

/// Which of `master_product_ids` the merchant has already selected.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn selected_master_ids(
    pool: &PgPool,
    merchant_id: MerchantId,
    master_product_ids: &[i32],
) -> Result<Vec<MasterProductId>, RepositoryError> {
    let ids = sqlx::query_scalar::<_, MasterProductId>(
        "SELECT master_product_id FROM smart_add_selections
         WHERE merchant_id = $1 AND master_product_id = ANY($2)
         ORDER BY master_product_id",
    )
    .bind(merchant_id)
    .bind(master_product_ids)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Record a smart-add selection inside a transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the merchant already selected this
/// master product.
pub async fn create_selection(
    conn: &mut PgConnection,
    merchant_id: MerchantId,
    master_product_id: MasterProductId,
) -> Result<SmartAddSelection, RepositoryError> {
    sqlx::query_as::<_, SmartAddSelection>(
        "INSERT INTO smart_add_selections (merchant_id, master_product_id)
         VALUES ($1, $2)
         RETURNING id, merchant_id, master_product_id, added_at",
    )
    .bind(merchant_id)
    .bind(master_product_id)
    .fetch_one(conn)
    .await
    .map_err(|e| RepositoryError::from_unique_violation(e, "already added"))
}

/// Remove a merchant's selection of a master product.
///
/// Returns `true` if a selection was removed.
///
/// # Errors
///
/// Returns error if the database delete fails.
pub async fn delete_selection(
    pool: &PgPool,
    merchant_id: MerchantId,
    master_product_id: MasterProductId,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        "DELETE FROM smart_add_selections
         WHERE merchant_id = $1 AND master_product_id = $2",
    )
    .bind(merchant_id)
    .bind(master_product_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
