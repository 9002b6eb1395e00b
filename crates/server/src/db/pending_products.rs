//! Database operations for pending products (the review queue).

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use bodega_core::{MasterCategoryId, MerchantId, PendingProductId};

use super::RepositoryError;
use crate::models::product::{PendingProduct, PendingReview};

const PENDING_COLUMNS: &str = "id, merchant_id, name, description, stock, original_price, \
     discount_price, image, category_id, is_approved, review_notes, created_at, updated_at";

/// Parameters for creating a pending product from a merchant submission.
pub struct NewSubmission<'a> {
    pub merchant_id: MerchantId,
    pub name: &'a str,
    pub description: &'a str,
    pub stock: i32,
    pub original_price: Decimal,
    pub discount_price: Option<Decimal>,
    /// Blob reference written before the row is inserted.
    pub image: Option<&'a str>,
}

/// Create a pending product from a merchant submission.
///
/// # Errors
///
/// Returns error if the database insert fails.
pub async fn create(
    pool: &PgPool,
    params: NewSubmission<'_>,
) -> Result<PendingProduct, RepositoryError> {
    let pending = sqlx::query_as::<_, PendingProduct>(&format!(
        "INSERT INTO pending_products
             (merchant_id, name, description, stock, original_price, discount_price, image)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {PENDING_COLUMNS}"
    ))
    .bind(params.merchant_id)
    .bind(params.name)
    .bind(params.description)
    .bind(params.stock)
    .bind(params.original_price)
    .bind(params.discount_price)
    .bind(params.image)
    .fetch_one(pool)
    .await?;

    Ok(pending)
}

/// List unapproved submissions with their submitter's email, newest first.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn list_unapproved(pool: &PgPool) -> Result<Vec<PendingReview>, RepositoryError> {
    let rows = sqlx::query_as::<_, PendingReview>(
        "SELECT p.id, p.merchant_id, m.email AS merchant_email, p.name, p.description,
                p.stock, p.original_price, p.discount_price, p.image, p.category_id,
                p.is_approved, p.review_notes, p.created_at, p.updated_at
         FROM pending_products p
         JOIN merchants m ON m.id = p.merchant_id
         WHERE NOT p.is_approved
         ORDER BY p.created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get a pending product by ID.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get(
    pool: &PgPool,
    id: PendingProductId,
) -> Result<Option<PendingProduct>, RepositoryError> {
    let pending = sqlx::query_as::<_, PendingProduct>(&format!(
        "SELECT {PENDING_COLUMNS} FROM pending_products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(pending)
}

/// Get a pending product with a row lock, inside a transaction.
///
/// Concurrent approval/rejection attempts on the same row serialize here:
/// only the first to commit observes the row as present and unapproved.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get_for_update(
    conn: &mut PgConnection,
    id: PendingProductId,
) -> Result<Option<PendingProduct>, RepositoryError> {
    let pending = sqlx::query_as::<_, PendingProduct>(&format!(
        "SELECT {PENDING_COLUMNS} FROM pending_products WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(pending)
}

/// Update the reviewer-editable fields (category, notes) of an unapproved
/// submission. The approval flag is only set by the approval state machine.
///
/// Fields passed as `None` are left untouched.
///
/// # Errors
///
/// Returns error if the database update fails.
pub async fn update_review_fields(
    pool: &PgPool,
    id: PendingProductId,
    category_id: Option<MasterCategoryId>,
    review_notes: Option<&str>,
) -> Result<Option<PendingProduct>, RepositoryError> {
    let pending = sqlx::query_as::<_, PendingProduct>(&format!(
        "UPDATE pending_products
         SET category_id = COALESCE($2, category_id),
             review_notes = COALESCE($3, review_notes),
             updated_at = NOW()
         WHERE id = $1 AND NOT is_approved
         RETURNING {PENDING_COLUMNS}"
    ))
    .bind(id)
    .bind(category_id)
    .bind(review_notes)
    .fetch_optional(pool)
    .await?;

    Ok(pending)
}

/// Mark a pending product approved, recording the reviewed category and any
/// final notes, inside the approval transaction.
///
/// # Errors
///
/// Returns error if the database update fails.
pub async fn mark_approved(
    conn: &mut PgConnection,
    id: PendingProductId,
    category_id: MasterCategoryId,
    review_notes: Option<&str>,
) -> Result<(), RepositoryError> {
    sqlx::query(
        "UPDATE pending_products
         SET is_approved = TRUE,
             category_id = $2,
             review_notes = COALESCE($3, review_notes),
             updated_at = NOW()
         WHERE id = $1",
    )
    .bind(id)
    .bind(category_id)
    .bind(review_notes)
    .execute(conn)
    .await?;

    Ok(())
}

/// Delete a pending product, inside the approval/rejection transaction.
///
/// # Errors
///
/// Returns error if the database delete fails.
pub async fn delete(conn: &mut PgConnection, id: PendingProductId) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM pending_products WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(())
}
