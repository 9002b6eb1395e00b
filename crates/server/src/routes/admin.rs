//! Reviewer route handlers for the pending-product queue.
//!
//! Approval and rejection are explicit entry points into the approval state
//! machine; the PATCH endpoint only edits category and notes and cannot flip
//! the approval flag. Batch endpoints process each id independently so one
//! failure never blocks the rest of a selection.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bodega_core::{MasterCategoryId, MerchantId, PendingProductId, ProductId};

use crate::db::pending_products;
use crate::error::AppError;
use crate::middleware::RequireReviewer;
use crate::models::product::{PendingProduct, PendingReview};
use crate::services::ApprovalService;
use crate::services::approval::{ApprovalError, ApprovalWarning};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// A pending submission as shown to reviewers.
#[derive(Debug, Serialize)]
pub struct PendingProductResponse {
    pub id: PendingProductId,
    pub merchant_id: MerchantId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_email: Option<String>,
    pub name: String,
    pub description: String,
    pub stock: i32,
    pub original_price: Decimal,
    pub discount_price: Option<Decimal>,
    pub image_url: Option<String>,
    pub category_id: Option<MasterCategoryId>,
    pub review_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PendingProductResponse {
    fn from_review(state: &AppState, p: &PendingReview) -> Self {
        Self {
            id: p.id,
            merchant_id: p.merchant_id,
            merchant_email: Some(p.merchant_email.clone()),
            name: p.name.clone(),
            description: p.description.clone(),
            stock: p.stock,
            original_price: p.original_price,
            discount_price: p.discount_price,
            image_url: p.image.as_deref().map(|path| state.store().url(path)),
            category_id: p.category_id,
            review_notes: p.review_notes.clone(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }

    fn from_pending(state: &AppState, p: &PendingProduct) -> Self {
        Self {
            id: p.id,
            merchant_id: p.merchant_id,
            merchant_email: None,
            name: p.name.clone(),
            description: p.description.clone(),
            stock: p.stock,
            original_price: p.original_price,
            discount_price: p.discount_price,
            image_url: p.image.as_deref().map(|path| state.store().url(path)),
            category_id: p.category_id,
            review_notes: p.review_notes.clone(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Reviewer edits to a pending submission. The approval flag is
/// intentionally not accepted here; unknown fields are rejected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewPatch {
    pub category_id: Option<MasterCategoryId>,
    pub review_notes: Option<String>,
}

/// Approval request body. Send `{}` when nothing is overridden.
#[derive(Debug, Deserialize, Default)]
pub struct ApproveRequest {
    pub category_id: Option<MasterCategoryId>,
    pub review_notes: Option<String>,
}

/// Rejection request body.
#[derive(Debug, Deserialize, Default)]
pub struct RejectRequest {
    pub review_notes: Option<String>,
}

/// Approval response.
#[derive(Debug, Serialize)]
pub struct ApproveResponse {
    pub message: String,
    pub approved_product_id: ProductId,
    pub warnings: Vec<ApprovalWarning>,
}

/// Rejection response.
#[derive(Debug, Serialize)]
pub struct RejectResponse {
    pub message: String,
    pub warnings: Vec<ApprovalWarning>,
}

/// Batch approval request body.
#[derive(Debug, Deserialize)]
pub struct BatchApproveRequest {
    pub ids: Vec<PendingProductId>,
    pub category_id: Option<MasterCategoryId>,
    pub review_notes: Option<String>,
}

/// Batch rejection request body.
#[derive(Debug, Deserialize)]
pub struct BatchRejectRequest {
    pub ids: Vec<PendingProductId>,
    pub review_notes: Option<String>,
}

/// Per-id outcome of a batch operation.
#[derive(Debug, Serialize)]
pub struct BatchEntry {
    pub id: PendingProductId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_product_id: Option<ProductId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ApprovalWarning>,
}

/// Batch response.
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<BatchEntry>,
}

// =============================================================================
// Queue Handlers
// =============================================================================

/// List unapproved submissions, newest first.
///
/// GET /api/admin/pending-products
///
/// # Errors
///
/// Returns 403 for non-reviewers.
pub async fn list(
    State(state): State<AppState>,
    RequireReviewer(_reviewer): RequireReviewer,
) -> Result<Json<Vec<PendingProductResponse>>, AppError> {
    let items = pending_products::list_unapproved(state.pool()).await?;
    let responses = items
        .iter()
        .map(|p| PendingProductResponse::from_review(&state, p))
        .collect();

    Ok(Json(responses))
}

/// Get one pending submission.
///
/// GET /api/admin/pending-products/{id}
///
/// # Errors
///
/// Returns 404 if the submission doesn't exist.
pub async fn get(
    State(state): State<AppState>,
    RequireReviewer(_reviewer): RequireReviewer,
    Path(id): Path<PendingProductId>,
) -> Result<Json<PendingProductResponse>, AppError> {
    let pending = pending_products::get(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("pending product".to_owned()))?;

    Ok(Json(PendingProductResponse::from_pending(&state, &pending)))
}

/// Edit a submission's category and/or reviewer notes.
///
/// PATCH /api/admin/pending-products/{id}
///
/// # Errors
///
/// Returns 404 if the submission doesn't exist or is mid-approval.
pub async fn update(
    State(state): State<AppState>,
    RequireReviewer(_reviewer): RequireReviewer,
    Path(id): Path<PendingProductId>,
    Json(body): Json<ReviewPatch>,
) -> Result<Json<PendingProductResponse>, AppError> {
    let pending = pending_products::update_review_fields(
        state.pool(),
        id,
        body.category_id,
        body.review_notes.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("pending product".to_owned()))?;

    Ok(Json(PendingProductResponse::from_pending(&state, &pending)))
}

// =============================================================================
// Approval Handlers
// =============================================================================

/// Approve a pending product, converting it into a live product.
///
/// POST /api/admin/pending-products/{id}/approve
///
/// # Errors
///
/// Returns 400 if no category is available, 409 if already approved, and
/// 404 if the submission doesn't exist.
pub async fn approve(
    State(state): State<AppState>,
    RequireReviewer(_reviewer): RequireReviewer,
    Path(id): Path<PendingProductId>,
    Json(body): Json<ApproveRequest>,
) -> Result<Json<ApproveResponse>, AppError> {

    let service = ApprovalService::new(state.pool(), state.store());
    let outcome = service
        .approve(id, body.category_id, body.review_notes.as_deref())
        .await?;

    Ok(Json(ApproveResponse {
        message: "Product approved and moved to merchant inventory".to_owned(),
        approved_product_id: outcome.product.id,
        warnings: outcome.warnings,
    }))
}

/// Reject a pending product, discarding it after notifying the merchant.
///
/// POST /api/admin/pending-products/{id}/reject
///
/// # Errors
///
/// Returns 409 if already approved and 404 if the submission doesn't exist.
pub async fn reject(
    State(state): State<AppState>,
    RequireReviewer(_reviewer): RequireReviewer,
    Path(id): Path<PendingProductId>,
    Json(body): Json<RejectRequest>,
) -> Result<Json<RejectResponse>, AppError> {

    let service = ApprovalService::new(state.pool(), state.store());
    let outcome = service.reject(id, body.review_notes.as_deref()).await?;

    Ok(Json(RejectResponse {
        message: "Product rejected and removed from the pending queue".to_owned(),
        warnings: outcome.warnings,
    }))
}

/// Approve a selection of pending products, each independently.
///
/// POST /api/admin/pending-products/approve-batch
///
/// # Errors
///
/// Returns 403 for non-reviewers; per-id failures land in the body.
pub async fn approve_batch(
    State(state): State<AppState>,
    RequireReviewer(_reviewer): RequireReviewer,
    Json(body): Json<BatchApproveRequest>,
) -> Result<Json<BatchResponse>, AppError> {
    let service = ApprovalService::new(state.pool(), state.store());
    let results = service
        .approve_batch(&body.ids, body.category_id, body.review_notes.as_deref())
        .await;

    let entries: Vec<BatchEntry> = results
        .into_iter()
        .map(|(id, result)| match result {
            Ok(outcome) => BatchEntry {
                id,
                status: "approved",
                approved_product_id: Some(outcome.product.id),
                error: None,
                warnings: outcome.warnings,
            },
            Err(e) => BatchEntry {
                id,
                status: "failed",
                approved_product_id: None,
                error: Some(batch_error_message(&e)),
                warnings: Vec::new(),
            },
        })
        .collect();

    Ok(Json(summarize(entries)))
}

/// Reject a selection of pending products, each independently.
///
/// POST /api/admin/pending-products/reject-batch
///
/// # Errors
///
/// Returns 403 for non-reviewers; per-id failures land in the body.
pub async fn reject_batch(
    State(state): State<AppState>,
    RequireReviewer(_reviewer): RequireReviewer,
    Json(body): Json<BatchRejectRequest>,
) -> Result<Json<BatchResponse>, AppError> {
    let service = ApprovalService::new(state.pool(), state.store());
    let results = service
        .reject_batch(&body.ids, body.review_notes.as_deref())
        .await;

    let entries: Vec<BatchEntry> = results
        .into_iter()
        .map(|(id, result)| match result {
            Ok(outcome) => BatchEntry {
                id,
                status: "rejected",
                approved_product_id: None,
                error: None,
                warnings: outcome.warnings,
            },
            Err(e) => BatchEntry {
                id,
                status: "failed",
                approved_product_id: None,
                error: Some(batch_error_message(&e)),
                warnings: Vec::new(),
            },
        })
        .collect();

    Ok(Json(summarize(entries)))
}

/// Per-entry error text; internal details stay out of the body.
fn batch_error_message(e: &ApprovalError) -> String {
    match e {
        ApprovalError::Repository(_) => "internal error".to_owned(),
        other => other.to_string(),
    }
}

fn summarize(entries: Vec<BatchEntry>) -> BatchResponse {
    let failed = entries.iter().filter(|e| e.status == "failed").count();
    BatchResponse {
        succeeded: entries.len() - failed,
        failed,
        results: entries,
    }
}
