//! The pending-product approval state machine.
//!
//! A submission is `Pending` until a reviewer approves or rejects it; both
//! outcomes delete the pending row. The machine has two tiers with an
//! explicit boundary between them:
//!
//! - **Atomic tier** (one transaction): lock the pending row, validate the
//!   preconditions, mark it approved, create the live product, delete the
//!   pending row. Any failure rolls the whole tier back and the submission
//!   stays pending.
//! - **Best-effort tier** (after commit): migrate the image blob to the new
//!   product and record the approval notification. Failures here surface as
//!   warnings on an otherwise successful outcome.
//!
//! Concurrent attempts on the same submission serialize on the row lock;
//! the loser observes either "already approved" or "not found".

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use bodega_core::{MasterCategoryId, PendingProductId};

use crate::db::{RepositoryError, catalog, pending_products, products};
use crate::models::product::Product;
use crate::services::{assets, notifier};
use crate::storage::BlobStore;

/// Errors that abort an approval or rejection before any visible change.
#[derive(Debug, Error)]
pub enum ApprovalError {
    /// No category was supplied and none was set by a prior reviewer edit.
    #[error("category required")]
    MissingCategory,

    /// The supplied category does not exist.
    #[error("unknown category")]
    UnknownCategory,

    /// The submission was already approved.
    #[error("product already approved")]
    AlreadyApproved,

    /// The submission does not exist (or was already resolved).
    #[error("pending product not found")]
    NotFound,

    /// Unexpected failure in the atomic tier; everything rolled back.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ApprovalError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::NotFound,
            other => Self::Repository(other),
        }
    }
}

impl From<sqlx::Error> for ApprovalError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// A best-effort step that failed after the atomic tier committed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "step", content = "detail", rename_all = "snake_case")]
pub enum ApprovalWarning {
    /// The pending image could not be migrated to the new product.
    ImageMigration(String),
    /// The pending image could not be removed after rejection.
    ImageCleanup(String),
    /// The outcome notification could not be recorded.
    Notification(String),
}

/// A successful approval: the live product, plus any best-effort warnings.
#[derive(Debug)]
pub struct ApprovalOutcome {
    pub product: Product,
    pub warnings: Vec<ApprovalWarning>,
}

/// A successful rejection, plus any best-effort warnings.
#[derive(Debug)]
pub struct RejectionOutcome {
    pub warnings: Vec<ApprovalWarning>,
}

/// The approval state machine.
pub struct ApprovalService<'a> {
    pool: &'a PgPool,
    store: &'a dyn BlobStore,
}

impl<'a> ApprovalService<'a> {
    /// Create a new approval service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, store: &'a dyn BlobStore) -> Self {
        Self { pool, store }
    }

    /// Approve a pending product.
    ///
    /// `category` overrides any category set by a prior reviewer edit;
    /// one of the two must be present. `notes` replaces the stored reviewer
    /// notes when given.
    ///
    /// # Errors
    ///
    /// Returns `ApprovalError::MissingCategory` / `UnknownCategory` /
    /// `AlreadyApproved` / `NotFound` with no state change, or
    /// `ApprovalError::Repository` after a full rollback of the atomic tier.
    pub async fn approve(
        &self,
        id: PendingProductId,
        category: Option<MasterCategoryId>,
        notes: Option<&str>,
    ) -> Result<ApprovalOutcome, ApprovalError> {
        // Atomic tier: everything up to the commit is all-or-nothing.
        let mut tx = self.pool.begin().await?;

        let pending = pending_products::get_for_update(&mut tx, id)
            .await?
            .ok_or(ApprovalError::NotFound)?;

        if pending.is_approved {
            return Err(ApprovalError::AlreadyApproved);
        }

        let category_id = category
            .or(pending.category_id)
            .ok_or(ApprovalError::MissingCategory)?;
        let category = catalog::get_category(&mut *tx, category_id)
            .await?
            .ok_or(ApprovalError::UnknownCategory)?;

        pending_products::mark_approved(&mut tx, id, category_id, notes).await?;
        let mut product = products::create_from_pending(&mut tx, &pending, category_id).await?;
        pending_products::delete(&mut tx, id).await?;

        tx.commit().await?;
        tracing::info!(
            pending_id = %id,
            product_id = %product.id,
            merchant_id = %product.merchant_id,
            "pending product approved"
        );

        // Best-effort tier: the approval stands even if these fail.
        let mut warnings = Vec::new();

        if let Some(source) = &pending.image {
            match assets::migrate_image(self.store, source, product.merchant_id).await {
                Ok(dest) => match products::set_image(self.pool, product.id, Some(&dest)).await {
                    Ok(()) => product.image = Some(dest),
                    Err(e) => {
                        tracing::error!(product_id = %product.id, error = %e,
                            "failed to record migrated image");
                        warnings.push(ApprovalWarning::ImageMigration(e.to_string()));
                    }
                },
                Err(e) => {
                    tracing::error!(pending_id = %id, product_id = %product.id, error = %e,
                        "failed to migrate pending image");
                    warnings.push(ApprovalWarning::ImageMigration(e.to_string()));
                }
            }
        }

        if let Err(e) = notifier::notify_approved(self.pool, &product, &category.name).await {
            tracing::error!(product_id = %product.id, error = %e,
                "failed to record approval notification");
            warnings.push(ApprovalWarning::Notification(e.to_string()));
        }

        Ok(ApprovalOutcome { product, warnings })
    }

    /// Reject a pending product.
    ///
    /// The rejection notification (carrying `notes`) and the delete of the
    /// pending row commit together; removing the image blob is best-effort
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ApprovalError::AlreadyApproved` / `NotFound` with no state
    /// change, or `ApprovalError::Repository` after a full rollback.
    pub async fn reject(
        &self,
        id: PendingProductId,
        notes: Option<&str>,
    ) -> Result<RejectionOutcome, ApprovalError> {
        let mut tx = self.pool.begin().await?;

        let pending = pending_products::get_for_update(&mut tx, id)
            .await?
            .ok_or(ApprovalError::NotFound)?;

        if pending.is_approved {
            return Err(ApprovalError::AlreadyApproved);
        }

        notifier::notify_rejected(&mut tx, &pending, notes.unwrap_or("")).await?;
        pending_products::delete(&mut tx, id).await?;

        tx.commit().await?;
        tracing::info!(pending_id = %id, merchant_id = %pending.merchant_id,
            "pending product rejected");

        let mut warnings = Vec::new();
        if let Some(source) = &pending.image
            && let Err(e) = self.store.delete(source).await
        {
            tracing::error!(pending_id = %id, error = %e,
                "failed to delete rejected submission image");
            warnings.push(ApprovalWarning::ImageCleanup(e.to_string()));
        }

        Ok(RejectionOutcome { warnings })
    }

    /// Approve every id in a selection set, each independently: one failure
    /// does not block the rest.
    pub async fn approve_batch(
        &self,
        ids: &[PendingProductId],
        category: Option<MasterCategoryId>,
        notes: Option<&str>,
    ) -> Vec<(PendingProductId, Result<ApprovalOutcome, ApprovalError>)> {
        let mut results = Vec::with_capacity(ids.len());
        for &id in ids {
            let result = self.approve(id, category, notes).await;
            if let Err(e) = &result {
                tracing::warn!(pending_id = %id, error = %e, "batch approval entry failed");
            }
            results.push((id, result));
        }
        results
    }

    /// Reject every id in a selection set, each independently.
    pub async fn reject_batch(
        &self,
        ids: &[PendingProductId],
        notes: Option<&str>,
    ) -> Vec<(PendingProductId, Result<RejectionOutcome, ApprovalError>)> {
        let mut results = Vec::with_capacity(ids.len());
        for &id in ids {
            let result = self.reject(id, notes).await;
            if let Err(e) = &result {
                tracing::warn!(pending_id = %id, error = %e, "batch rejection entry failed");
            }
            results.push((id, result));
        }
        results
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_not_found_maps_to_not_found() {
        let err: ApprovalError = RepositoryError::NotFound.into();
        assert!(matches!(err, ApprovalError::NotFound));
    }

    #[test]
    fn test_warning_serialization_shape() {
        let warning = ApprovalWarning::ImageMigration("disk full".to_owned());
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["step"], "image_migration");
        assert_eq!(json["detail"], "disk full");
    }
}
