//! Database operations for live merchant products.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgExecutor, PgPool};

use bodega_core::{MasterCategoryId, MerchantId, ProductId};

use super::RepositoryError;
use crate::models::catalog::MasterProduct;
use crate::models::product::{PendingProduct, Product};

const PRODUCT_COLUMNS: &str = "id, merchant_id, master_product_id, name, description, stock, \
     original_price, discount_price, image, category_id, created_at";

/// List a merchant's products, newest first.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn list_for_merchant(
    pool: &PgPool,
    merchant_id: MerchantId,
) -> Result<Vec<Product>, RepositoryError> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products
         WHERE merchant_id = $1
         ORDER BY created_at DESC"
    ))
    .bind(merchant_id)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

/// Get one of a merchant's products by ID.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get_for_merchant(
    pool: &PgPool,
    id: ProductId,
    merchant_id: MerchantId,
) -> Result<Option<Product>, RepositoryError> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products
         WHERE id = $1 AND merchant_id = $2"
    ))
    .bind(id)
    .bind(merchant_id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

/// Create the live product for an approved submission, inside the approval
/// transaction. The image reference is attached later by the asset migrator.
///
/// # Errors
///
/// Returns error if the database insert fails.
pub async fn create_from_pending(
    conn: &mut PgConnection,
    pending: &PendingProduct,
    category_id: MasterCategoryId,
) -> Result<Product, RepositoryError> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "INSERT INTO products
             (merchant_id, name, description, stock, original_price, discount_price, category_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(pending.merchant_id)
    .bind(&pending.name)
    .bind(&pending.description)
    .bind(pending.stock)
    .bind(pending.original_price)
    .bind(pending.discount_price)
    .bind(category_id)
    .fetch_one(conn)
    .await?;

    Ok(product)
}

/// Create a zero-priced copy of a master product for a merchant, inside the
/// smart-add transaction. Prices and stock are placeholders the merchant
/// fills in afterwards.
///
/// # Errors
///
/// Returns error if the database insert fails.
pub async fn create_from_master(
    conn: &mut PgConnection,
    merchant_id: MerchantId,
    master: &MasterProduct,
) -> Result<Product, RepositoryError> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "INSERT INTO products
             (merchant_id, master_product_id, name, description, stock,
              original_price, discount_price, category_id)
         VALUES ($1, $2, $3, $4, 0, 0, NULL, $5)
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(merchant_id)
    .bind(master.id)
    .bind(&master.name)
    .bind(&master.description)
    .bind(master.category_id)
    .fetch_one(conn)
    .await?;

    Ok(product)
}

/// Replace the listing fields of a merchant's product.
///
/// # Errors
///
/// Returns error if the database update fails.
pub async fn update_listing(
    pool: &PgPool,
    id: ProductId,
    merchant_id: MerchantId,
    name: &str,
    description: &str,
    stock: i32,
    original_price: Decimal,
    discount_price: Option<Decimal>,
) -> Result<Option<Product>, RepositoryError> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "UPDATE products
         SET name = $3, description = $4, stock = $5, original_price = $6, discount_price = $7
         WHERE id = $1 AND merchant_id = $2
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(id)
    .bind(merchant_id)
    .bind(name)
    .bind(description)
    .bind(stock)
    .bind(original_price)
    .bind(discount_price)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

/// Set (or clear) a product's image reference.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the product doesn't exist.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn set_image(
    executor: impl PgExecutor<'_>,
    id: ProductId,
    image: Option<&str>,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("UPDATE products SET image = $2 WHERE id = $1")
        .bind(id)
        .bind(image)
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}

/// Delete a merchant's product, returning the deleted row so the caller can
/// clean up its image blob.
///
/// # Errors
///
/// Returns error if the database delete fails.
pub async fn delete_for_merchant(
    pool: &PgPool,
    id: ProductId,
    merchant_id: MerchantId,
) -> Result<Option<Product>, RepositoryError> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "DELETE FROM products
         WHERE id = $1 AND merchant_id = $2
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(id)
    .bind(merchant_id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}
