//! Merchant inventory handlers.
//!
//! Listing and editing live products, and submitting new products for
//! review. A submission is acknowledged with 202 Accepted and lands in the
//! review queue; it only becomes a live product once a reviewer approves it.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bodega_core::{MasterCategoryId, PendingProductId, Pricing, ProductId};

use crate::db::{pending_products, products};
use crate::db::pending_products::NewSubmission;
use crate::error::AppError;
use crate::middleware::RequireMerchant;
use crate::models::product::Product;
use crate::services::assets::PENDING_IMAGE_PREFIX;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// A live product as returned to its merchant.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub stock: i32,
    pub original_price: Decimal,
    pub discount_price: Option<Decimal>,
    pub image_url: Option<String>,
    pub category_id: Option<MasterCategoryId>,
    pub created_at: DateTime<Utc>,
}

impl ProductResponse {
    pub(crate) fn from_product(state: &AppState, product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            stock: product.stock,
            original_price: product.original_price,
            discount_price: product.discount_price,
            image_url: product.image.as_deref().map(|p| state.store().url(p)),
            category_id: product.category_id,
            created_at: product.created_at,
        }
    }
}

/// Acknowledgement for a queued submission (not a created product).
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub message: String,
    pub pending_product_id: PendingProductId,
}

/// Partial update for a live product.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub stock: Option<i32>,
    pub original_price: Option<Decimal>,
    pub discount_price: Option<Decimal>,
}

/// Generic message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Fields collected from the multipart submission form.
#[derive(Default)]
struct SubmissionForm {
    name: Option<String>,
    description: String,
    stock: Option<i32>,
    original_price: Option<Decimal>,
    discount_price: Option<Decimal>,
    image: Option<(Option<String>, Vec<u8>)>,
}

// =============================================================================
// Handlers
// =============================================================================

/// List the merchant's live products, newest first.
///
/// GET /api/products
///
/// # Errors
///
/// Returns 401 if not logged in.
pub async fn list(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let items = products::list_for_merchant(state.pool(), current.id).await?;
    let responses = items
        .iter()
        .map(|p| ProductResponse::from_product(&state, p))
        .collect();

    Ok(Json(responses))
}

/// Get one of the merchant's products.
///
/// GET /api/products/{id}
///
/// # Errors
///
/// Returns 404 if the product doesn't exist or belongs to another merchant.
pub async fn get(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = products::get_for_merchant(state.pool(), id, current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("product".to_owned()))?;

    Ok(Json(ProductResponse::from_product(&state, &product)))
}

/// Submit a new product for review (multipart form).
///
/// POST /api/products
///
/// Text parts: `name`, `description`, `stock`, `original_price`,
/// `discount_price` (optional). File part: `image` (optional). Prices are
/// validated up front; the submission is queued for review, not created as
/// a live product, so the response is 202 Accepted.
///
/// # Errors
///
/// Returns 400 with field-level detail for validation failures.
pub async fn submit(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
    multipart: Multipart,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    let form = read_submission_form(multipart).await?;

    let name = form
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::validation("name", "name is required"))?;
    let original_price = form
        .original_price
        .ok_or_else(|| AppError::validation("original_price", "original price is required"))?;
    let stock = form.stock.unwrap_or(0);
    if stock < 0 {
        return Err(AppError::validation("stock", "stock cannot be negative"));
    }

    // Shared price validation: positive original, discount <= original.
    let pricing = Pricing::new(original_price, form.discount_price)?;

    // Stage the image blob before the row so the row never references a
    // missing blob.
    let image_path = if let Some((extension, bytes)) = form.image {
        let filename = extension.map_or_else(
            || Uuid::new_v4().to_string(),
            |ext| format!("{}.{ext}", Uuid::new_v4()),
        );
        let path = format!("{PENDING_IMAGE_PREFIX}/{}/{filename}", current.id);
        state.store().write(&path, &bytes).await?;
        Some(path)
    } else {
        None
    };

    let created = pending_products::create(
        state.pool(),
        NewSubmission {
            merchant_id: current.id,
            name,
            description: &form.description,
            stock,
            original_price: pricing.original(),
            discount_price: pricing.discount(),
            image: image_path.as_deref(),
        },
    )
    .await;

    let pending = match created {
        Ok(pending) => pending,
        Err(e) => {
            // The submission failed; don't leave the staged blob behind.
            if let Some(path) = &image_path
                && let Err(cleanup) = state.store().delete(path).await
            {
                tracing::warn!(path = %path, error = %cleanup,
                    "failed to clean up staged submission image");
            }
            return Err(e.into());
        }
    };

    tracing::info!(merchant_id = %current.id, pending_id = %pending.id,
        "new pending product submitted");

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmissionResponse {
            message: "Product submitted for review. It will appear in your inventory after \
                      approval."
                .to_owned(),
            pending_product_id: pending.id,
        }),
    ))
}

/// Update one of the merchant's products.
///
/// PATCH /api/products/{id}
///
/// Prices pass the same validation as submissions, applied to the merged
/// values.
///
/// # Errors
///
/// Returns 400 for invalid prices and 404 for unknown products.
pub async fn update(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
    Path(id): Path<ProductId>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    let existing = products::get_for_merchant(state.pool(), id, current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("product".to_owned()))?;

    let name = body.name.unwrap_or(existing.name);
    if name.trim().is_empty() {
        return Err(AppError::validation("name", "name is required"));
    }
    let description = body.description.unwrap_or(existing.description);
    let stock = body.stock.unwrap_or(existing.stock);
    if stock < 0 {
        return Err(AppError::validation("stock", "stock cannot be negative"));
    }

    let original_price = body.original_price.unwrap_or(existing.original_price);
    let discount_price = body.discount_price.or(existing.discount_price);
    let pricing = Pricing::new(original_price, discount_price)?;

    let product = products::update_listing(
        state.pool(),
        id,
        current.id,
        name.trim(),
        &description,
        stock,
        pricing.original(),
        pricing.discount(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("product".to_owned()))?;

    Ok(Json(ProductResponse::from_product(&state, &product)))
}

/// Delete one of the merchant's products.
///
/// DELETE /api/products/{id}
///
/// The image blob is removed best-effort after the row.
///
/// # Errors
///
/// Returns 404 for unknown products.
pub async fn delete(
    State(state): State<AppState>,
    RequireMerchant(current): RequireMerchant,
    Path(id): Path<ProductId>,
) -> Result<Json<MessageResponse>, AppError> {
    let product = products::delete_for_merchant(state.pool(), id, current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("product".to_owned()))?;

    if let Some(image) = &product.image
        && let Err(e) = state.store().delete(image).await
    {
        tracing::warn!(product_id = %id, path = %image, error = %e,
            "failed to delete product image");
    }

    Ok(Json(MessageResponse {
        message: "Product deleted".to_owned(),
    }))
}

// =============================================================================
// Multipart parsing
// =============================================================================

async fn read_submission_form(mut multipart: Multipart) -> Result<SubmissionForm, AppError> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation {
            field: None,
            message: format!("invalid multipart request: {e}"),
        })?
    {
        let name = field.name().unwrap_or("").to_owned();
        match name.as_str() {
            "name" => form.name = Some(read_text(&name, field).await?),
            "description" => form.description = read_text(&name, field).await?,
            "stock" => {
                let text = read_text(&name, field).await?;
                form.stock = Some(text.trim().parse::<i32>().map_err(|_| {
                    AppError::validation("stock", "stock must be a whole number")
                })?);
            }
            "original_price" => {
                let text = read_text(&name, field).await?;
                form.original_price = Some(parse_price("original_price", &text)?);
            }
            "discount_price" => {
                let text = read_text(&name, field).await?;
                if !text.trim().is_empty() {
                    form.discount_price = Some(parse_price("discount_price", &text)?);
                }
            }
            "image" => {
                let extension = field
                    .file_name()
                    .and_then(|f| f.rsplit('.').next().map(str::to_owned))
                    .filter(|ext| !ext.is_empty() && ext.len() <= 8);
                let bytes = field.bytes().await.map_err(|e| AppError::Validation {
                    field: None,
                    message: format!("failed to read upload: {e}"),
                })?;
                if !bytes.is_empty() {
                    form.image = Some((extension, bytes.to_vec()));
                }
            }
            other => {
                return Err(AppError::Validation {
                    field: None,
                    message: format!("unexpected field \"{other}\""),
                });
            }
        }
    }

    Ok(form)
}

async fn read_text(
    name: &str,
    field: axum::extract::multipart::Field<'_>,
) -> Result<String, AppError> {
    field.text().await.map_err(|e| AppError::Validation {
        field: None,
        message: format!("failed to read field \"{name}\": {e}"),
    })
}

fn parse_price(field: &'static str, text: &str) -> Result<Decimal, AppError> {
    text.trim()
        .parse::<Decimal>()
        .map_err(|_| AppError::validation(field, "must be a decimal number"))
}
