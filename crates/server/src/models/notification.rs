//! Merchant notifications.

use chrono::{DateTime, Utc};

use bodega_core::{MerchantId, NotificationId, ProductId};

/// A one-way message to a merchant.
///
/// Created by the notifier when a submission is approved or rejected; only
/// the recipient flips the read flag.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: MerchantId,
    pub message: String,
    pub is_read: bool,
    /// The product this message refers to (approval notifications only).
    pub product_id: Option<ProductId>,
    pub created_at: DateTime<Utc>,
}
