//! Merchant notification handlers.
//!
//! Merchants read the messages the notifier recorded for them; only the
//! recipient ever flips the read flag.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use bodega_core::{NotificationId, ProductId};

use crate::db::notifications;
use crate::error::AppError;
use crate::middleware::RequireMerchant;
use crate::state::AppState;

/// A notification as returned to its recipient.
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: NotificationId,
    pub message: String,
    pub is_read: bool,
    pub product_id: Option<ProductId>,
    pub created_at: DateTime<Utc>,
}

/// Unread-count response.
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

/// Generic message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// List the merchant's notifications, newest first.
///
/// GET /api/notifications
///
/// # Errors
///
/// Returns 401 if not logged in.
pub async fn list(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let items = notifications::list_for_recipient(state.pool(), current.id).await?;
    let responses = items
        .into_iter()
        .map(|n| NotificationResponse {
            id: n.id,
            message: n.message,
            is_read: n.is_read,
            product_id: n.product_id,
            created_at: n.created_at,
        })
        .collect();

    Ok(Json(responses))
}

/// Count the merchant's unread notifications.
///
/// GET /api/notifications/unread-count
///
/// # Errors
///
/// Returns 401 if not logged in.
pub async fn unread_count(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let unread_count = notifications::unread_count(state.pool(), current.id).await?;

    Ok(Json(UnreadCountResponse { unread_count }))
}

/// Mark one notification as read.
///
/// POST /api/notifications/{id}/read
///
/// # Errors
///
/// Returns 404 if the notification doesn't exist or belongs to another
/// merchant.
pub async fn mark_read(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
    Path(id): Path<NotificationId>,
) -> Result<Json<MessageResponse>, AppError> {
    let updated = notifications::mark_read(state.pool(), id, current.id).await?;
    if !updated {
        return Err(AppError::NotFound("notification".to_owned()));
    }

    Ok(Json(MessageResponse {
        message: "Notification marked as read".to_owned(),
    }))
}

/// Mark all of the merchant's notifications as read.
///
/// POST /api/notifications/read-all
///
/// # Errors
///
/// Returns 401 if not logged in.
pub async fn mark_all_read(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
) -> Result<Json<MessageResponse>, AppError> {
    let updated = notifications::mark_all_read(state.pool(), current.id).await?;

    Ok(Json(MessageResponse {
        message: format!("{updated} notifications marked as read"),
    }))
}
