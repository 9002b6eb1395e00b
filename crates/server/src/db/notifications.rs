//! Database operations for merchant notifications.

use sqlx::{PgExecutor, PgPool};

use bodega_core::{MerchantId, NotificationId, ProductId};

use super::RepositoryError;
use crate::models::notification::Notification;

const NOTIFICATION_COLUMNS: &str = "id, recipient_id, message, is_read, product_id, created_at";

/// Create a notification. Accepts a pool or a transaction connection so the
/// rejection path can create its notification atomically with the delete.
///
/// # Errors
///
/// Returns error if the database insert fails.
pub async fn create(
    executor: impl PgExecutor<'_>,
    recipient_id: MerchantId,
    message: &str,
    product_id: Option<ProductId>,
) -> Result<Notification, RepositoryError> {
    let notification = sqlx::query_as::<_, Notification>(&format!(
        "INSERT INTO notifications (recipient_id, message, product_id)
         VALUES ($1, $2, $3)
         RETURNING {NOTIFICATION_COLUMNS}"
    ))
    .bind(recipient_id)
    .bind(message)
    .bind(product_id)
    .fetch_one(executor)
    .await?;

    Ok(notification)
}

/// List a merchant's notifications, newest first.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn list_for_recipient(
    pool: &PgPool,
    recipient_id: MerchantId,
) -> Result<Vec<Notification>, RepositoryError> {
    let notifications = sqlx::query_as::<_, Notification>(&format!(
        "SELECT {NOTIFICATION_COLUMNS} FROM notifications
         WHERE recipient_id = $1
         ORDER BY created_at DESC"
    ))
    .bind(recipient_id)
    .fetch_all(pool)
    .await?;

    Ok(notifications)
}

/// Count a merchant's unread notifications.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn unread_count(
    pool: &PgPool,
    recipient_id: MerchantId,
) -> Result<i64, RepositoryError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND NOT is_read",
    )
    .bind(recipient_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Mark one of a merchant's notifications as read.
///
/// Returns `false` if the notification does not exist or belongs to another
/// merchant.
///
/// # Errors
///
/// Returns error if the database update fails.
pub async fn mark_read(
    pool: &PgPool,
    id: NotificationId,
    recipient_id: MerchantId,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND recipient_id = $2",
    )
    .bind(id)
    .bind(recipient_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Mark all of a merchant's notifications as read.
///
/// Returns the number of notifications updated.
///
/// # Errors
///
/// Returns error if the database update fails.
pub async fn mark_all_read(
    pool: &PgPool,
    recipient_id: MerchantId,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query(
        "UPDATE notifications SET is_read = TRUE WHERE recipient_id = $1 AND NOT is_read",
    )
    .bind(recipient_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
