//! Merchant notifications for review outcomes.
//!
//! Append-only: the notifier writes a message addressed to one merchant and
//! never touches read state; the recipient mutates that through the
//! notifications surface.

use sqlx::{PgConnection, PgPool};

use crate::db::{RepositoryError, notifications};
use crate::models::product::{PendingProduct, Product};

/// Notes used in the rejection message when the reviewer left none.
pub const DEFAULT_REJECTION_NOTES: &str = "No specific reason provided.";

/// Message sent when a submission is approved.
fn approval_message(product_name: &str, category_name: &str) -> String {
    format!(
        "Your new product '{product_name}' has been approved under category: '{category_name}'."
    )
}

/// Message sent when a submission is rejected.
fn rejection_message(product_name: &str, notes: &str) -> String {
    format!("Your product '{product_name}' was reviewed and rejected. Reviewer notes: {notes}")
}

/// Record an approval notification for the product's merchant, referencing
/// the newly created product.
///
/// # Errors
///
/// Returns error if the database insert fails.
pub async fn notify_approved(
    pool: &PgPool,
    product: &Product,
    category_name: &str,
) -> Result<(), RepositoryError> {
    notifications::create(
        pool,
        product.merchant_id,
        &approval_message(&product.name, category_name),
        Some(product.id),
    )
    .await?;

    tracing::info!(
        merchant_id = %product.merchant_id,
        product_id = %product.id,
        "approval notification recorded"
    );
    Ok(())
}

/// Record a rejection notification inside the rejection transaction. Carries
/// the reviewer notes; no product reference exists for a rejection.
///
/// # Errors
///
/// Returns error if the database insert fails.
pub async fn notify_rejected(
    conn: &mut PgConnection,
    pending: &PendingProduct,
    notes: &str,
) -> Result<(), RepositoryError> {
    let notes = if notes.trim().is_empty() {
        DEFAULT_REJECTION_NOTES
    } else {
        notes
    };

    notifications::create(
        conn,
        pending.merchant_id,
        &rejection_message(&pending.name, notes),
        None,
    )
    .await?;

    tracing::info!(
        merchant_id = %pending.merchant_id,
        pending_id = %pending.id,
        "rejection notification recorded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approval_message_names_product_and_category() {
        let message = approval_message("Organic Honey", "Pantry");
        assert_eq!(
            message,
            "Your new product 'Organic Honey' has been approved under category: 'Pantry'."
        );
    }

    #[test]
    fn test_rejection_message_carries_notes() {
        let message = rejection_message("Organic Honey", "Image too blurry.");
        assert!(message.contains("'Organic Honey'"));
        assert!(message.contains("rejected"));
        assert!(message.ends_with("Image too blurry."));
    }
}
