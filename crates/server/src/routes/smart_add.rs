//! Smart-add route handlers.
//!
//! Merchants browse master categories matching their business, pick the
//! products they don't carry yet, and adopt a batch in one request.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use bodega_core::{MasterCategoryId, MasterProductId, ProductId};

use crate::error::AppError;
use crate::middleware::RequireMerchant;
use crate::routes::catalog::{MasterCategoryResponse, MasterProductResponse};
use crate::services::SmartAddService;
use crate::services::smart_add::SmartAddWarning;
use crate::state::AppState;

/// Bulk-add request body.
#[derive(Debug, Deserialize)]
pub struct BulkAddRequest {
    pub category_id: MasterCategoryId,
    pub product_ids: Vec<MasterProductId>,
}

/// A product created by the bulk add.
#[derive(Debug, Serialize)]
pub struct AddedProduct {
    pub id: ProductId,
    pub name: String,
    pub category_id: Option<MasterCategoryId>,
}

/// Bulk-add response.
#[derive(Debug, Serialize)]
pub struct BulkAddResponse {
    pub status: &'static str,
    pub added_count: usize,
    pub products: Vec<AddedProduct>,
    pub warnings: Vec<SmartAddWarning>,
}

/// Selection removal response.
#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub removed: bool,
}

/// Master categories matching the merchant's business category.
///
/// GET /api/smart-add/categories
///
/// # Errors
///
/// Returns 400 if the merchant has not onboarded.
pub async fn categories(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
) -> Result<Json<Vec<MasterCategoryResponse>>, AppError> {
    let service = SmartAddService::new(state.pool(), state.store());
    let categories = service.categories(current.id).await?;

    Ok(Json(
        categories.iter().map(MasterCategoryResponse::from).collect(),
    ))
}

/// Master products of a category the merchant hasn't selected yet.
///
/// GET /api/smart-add/products/{category_id}
///
/// # Errors
///
/// Returns 400 if the category doesn't belong to the merchant's business.
pub async fn available_products(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
    Path(category_id): Path<MasterCategoryId>,
) -> Result<Json<Vec<MasterProductResponse>>, AppError> {
    let service = SmartAddService::new(state.pool(), state.store());
    let products = service.available_products(current.id, category_id).await?;

    Ok(Json(
        products
            .iter()
            .map(|p| MasterProductResponse::from_master(&state, p))
            .collect(),
    ))
}

/// Adopt a batch of master products.
///
/// POST /api/smart-add/bulk-add
///
/// The whole batch is validated before any write; per-product image-copy
/// failures are reported as warnings on an otherwise successful response.
///
/// # Errors
///
/// Returns 400 for category/membership failures and 409 for duplicates.
pub async fn bulk_add(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
    Json(body): Json<BulkAddRequest>,
) -> Result<(StatusCode, Json<BulkAddResponse>), AppError> {
    let service = SmartAddService::new(state.pool(), state.store());
    let outcome = service
        .bulk_add(current.id, body.category_id, &body.product_ids)
        .await?;

    let products: Vec<AddedProduct> = outcome
        .products
        .iter()
        .map(|p| AddedProduct {
            id: p.id,
            name: p.name.clone(),
            category_id: p.category_id,
        })
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(BulkAddResponse {
            status: "success",
            added_count: products.len(),
            products,
            warnings: outcome.warnings,
        }),
    ))
}

/// Remove the merchant's selection of a master product.
///
/// DELETE /api/smart-add/products/{master_product_id}
///
/// # Errors
///
/// Returns 401 if not logged in.
pub async fn remove_selection(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
    Path(master_product_id): Path<MasterProductId>,
) -> Result<Json<RemoveResponse>, AppError> {
    let service = SmartAddService::new(state.pool(), state.store());
    let removed = service.remove_selection(current.id, master_product_id).await?;

    Ok(Json(RemoveResponse { removed }))
}
