//! Master catalog browse handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use bodega_core::{BusinessCategory, MasterCategoryId, MasterProductId};

use crate::db::catalog;
use crate::error::AppError;
use crate::middleware::RequireMerchant;
use crate::models::catalog::{MasterCategory, MasterProduct};
use crate::state::AppState;

/// Query parameters for the category list.
#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub business_category: Option<BusinessCategory>,
}

/// A master category as returned to merchants.
#[derive(Debug, Serialize)]
pub struct MasterCategoryResponse {
    pub id: MasterCategoryId,
    pub name: String,
    pub business_category: BusinessCategory,
}

impl From<&MasterCategory> for MasterCategoryResponse {
    fn from(c: &MasterCategory) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            business_category: c.business_category,
        }
    }
}

/// A master product as returned to merchants.
#[derive(Debug, Serialize)]
pub struct MasterProductResponse {
    pub id: MasterProductId,
    pub name: String,
    pub brand: Option<String>,
    pub description: String,
    pub image_url: Option<String>,
    pub category_id: Option<MasterCategoryId>,
}

impl MasterProductResponse {
    pub(crate) fn from_master(state: &AppState, product: &MasterProduct) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            brand: product.brand.clone(),
            description: product.description.clone(),
            image_url: product.image.as_deref().map(|p| state.store().url(p)),
            category_id: product.category_id,
        }
    }
}

/// List master categories for a business category.
///
/// GET /api/master-categories?business_category=Grocery
///
/// Without the filter, returns an empty list rather than the whole catalog.
///
/// # Errors
///
/// Returns 401 if not logged in.
pub async fn categories(
    State(state): State<AppState>,
    RequireMerchant(_current): RequireMerchant,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<MasterCategoryResponse>>, AppError> {
    let Some(business_category) = query.business_category else {
        return Ok(Json(Vec::new()));
    };

    let categories = catalog::list_categories_for(state.pool(), business_category).await?;
    Ok(Json(
        categories.iter().map(MasterCategoryResponse::from).collect(),
    ))
}

/// List all master products in a category.
///
/// GET /api/master-products/{category_id}
///
/// # Errors
///
/// Returns 401 if not logged in.
pub async fn products_by_category(
    State(state): State<AppState>,
    RequireMerchant(_current): RequireMerchant,
    Path(category_id): Path<MasterCategoryId>,
) -> Result<Json<Vec<MasterProductResponse>>, AppError> {
    let products = catalog::list_products_in_category(state.pool(), category_id).await?;
    Ok(Json(
        products
            .iter()
            .map(|p| MasterProductResponse::from_master(&state, p))
            .collect(),
    ))
}
