//! Smart-add: bulk adoption of master products into merchant inventory.
//!
//! The whole batch is validated before any write; the selection records and
//! product copies then commit in one transaction, and image copies run
//! best-effort afterwards so one bad image cannot block the other products.

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use bodega_core::{MasterCategoryId, MasterProductId, MerchantId, ProductId};

use crate::db::{RepositoryError, catalog, products};
use crate::db::merchants::MerchantRepository;
use crate::models::catalog::{MasterCategory, MasterProduct};
use crate::models::merchant::MerchantProfile;
use crate::models::product::Product;
use crate::services::assets;
use crate::storage::BlobStore;

/// Errors that reject a smart-add request before any write.
#[derive(Debug, Error)]
pub enum SmartAddError {
    /// The merchant has not completed onboarding.
    #[error("complete business onboarding first")]
    NotOnboarded,

    /// The category does not exist or belongs to another business category.
    #[error("invalid category")]
    InvalidCategory,

    /// Product ids that are not master products of the requested category.
    #[error("products not in category: {0:?}")]
    NotInCategory(Vec<i32>),

    /// Product ids this merchant has already added.
    #[error("already added: {0:?}")]
    AlreadyAdded(Vec<i32>),

    /// The request named no products.
    #[error("no products selected")]
    EmptySelection,

    /// Database failure; the transaction rolled back.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for SmartAddError {
    fn from(e: RepositoryError) -> Self {
        Self::Repository(e)
    }
}

impl From<sqlx::Error> for SmartAddError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// A per-product image-copy failure after the batch committed.
#[derive(Debug, Clone, Serialize)]
pub struct SmartAddWarning {
    /// The created product whose image copy failed.
    pub product_id: ProductId,
    pub detail: String,
}

/// A successful bulk add: the created products plus any image warnings.
#[derive(Debug)]
pub struct SmartAddOutcome {
    pub products: Vec<Product>,
    pub warnings: Vec<SmartAddWarning>,
}

/// Smart-add service.
pub struct SmartAddService<'a> {
    pool: &'a PgPool,
    store: &'a dyn BlobStore,
}

impl<'a> SmartAddService<'a> {
    /// Create a new smart-add service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, store: &'a dyn BlobStore) -> Self {
        Self { pool, store }
    }

    /// Master categories matching the merchant's declared business category.
    ///
    /// # Errors
    ///
    /// Returns `SmartAddError::NotOnboarded` if the merchant has no profile.
    pub async fn categories(
        &self,
        merchant_id: MerchantId,
    ) -> Result<Vec<MasterCategory>, SmartAddError> {
        let profile = self.onboarded_profile(merchant_id).await?;
        let categories =
            catalog::list_categories_for(self.pool, profile.business_category).await?;
        Ok(categories)
    }

    /// Master products of `category_id` the merchant has not yet selected.
    ///
    /// # Errors
    ///
    /// Returns `SmartAddError::InvalidCategory` if the category does not
    /// belong to the merchant's business category.
    pub async fn available_products(
        &self,
        merchant_id: MerchantId,
        category_id: MasterCategoryId,
    ) -> Result<Vec<MasterProduct>, SmartAddError> {
        let profile = self.onboarded_profile(merchant_id).await?;
        self.check_category(category_id, &profile).await?;

        let products =
            catalog::list_unselected_products(self.pool, category_id, merchant_id).await?;
        Ok(products)
    }

    /// Adopt a batch of master products into the merchant's inventory.
    ///
    /// # Errors
    ///
    /// The whole batch is rejected before any write if the category does not
    /// match the merchant's business category, any id is not in the
    /// category, or any id was already selected.
    pub async fn bulk_add(
        &self,
        merchant_id: MerchantId,
        category_id: MasterCategoryId,
        product_ids: &[MasterProductId],
    ) -> Result<SmartAddOutcome, SmartAddError> {
        if product_ids.is_empty() {
            return Err(SmartAddError::EmptySelection);
        }

        let profile = self.onboarded_profile(merchant_id).await?;
        self.check_category(category_id, &profile).await?;

        // Dedupe while keeping request order.
        let mut ids: Vec<i32> = Vec::with_capacity(product_ids.len());
        for id in product_ids {
            if !ids.contains(&id.as_i32()) {
                ids.push(id.as_i32());
            }
        }

        let masters =
            catalog::get_products_by_ids_in_category(self.pool, &ids, category_id).await?;
        if masters.len() != ids.len() {
            let found: Vec<i32> = masters.iter().map(|m| m.id.as_i32()).collect();
            let missing: Vec<i32> = ids.iter().copied().filter(|id| !found.contains(id)).collect();
            return Err(SmartAddError::NotInCategory(missing));
        }

        let already = catalog::selected_master_ids(self.pool, merchant_id, &ids).await?;
        if !already.is_empty() {
            return Err(SmartAddError::AlreadyAdded(
                already.iter().map(|id| id.as_i32()).collect(),
            ));
        }

        // All writes in one transaction; a concurrent duplicate add trips the
        // unique constraint and rolls the whole batch back.
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(masters.len());
        for master in &masters {
            catalog::create_selection(&mut tx, merchant_id, master.id)
                .await
                .map_err(|e| match e {
                    RepositoryError::Conflict(_) => {
                        SmartAddError::AlreadyAdded(vec![master.id.as_i32()])
                    }
                    other => SmartAddError::Repository(other),
                })?;
            let product = products::create_from_master(&mut tx, merchant_id, master).await?;
            created.push(product);
        }
        tx.commit().await?;
        tracing::info!(merchant_id = %merchant_id, count = created.len(),
            "smart-add batch committed");

        // Best-effort image copies; master images are shared, so copy only.
        let mut warnings = Vec::new();
        for (product, master) in created.iter_mut().zip(&masters) {
            let Some(source) = &master.image else {
                continue;
            };
            match assets::copy_image(self.store, source, merchant_id).await {
                Ok(dest) => match products::set_image(self.pool, product.id, Some(&dest)).await {
                    Ok(()) => product.image = Some(dest),
                    Err(e) => {
                        tracing::error!(product_id = %product.id, error = %e,
                            "failed to record copied image");
                        warnings.push(SmartAddWarning {
                            product_id: product.id,
                            detail: e.to_string(),
                        });
                    }
                },
                Err(e) => {
                    tracing::error!(product_id = %product.id, error = %e,
                        "failed to copy master image");
                    warnings.push(SmartAddWarning {
                        product_id: product.id,
                        detail: e.to_string(),
                    });
                }
            }
        }

        Ok(SmartAddOutcome {
            products: created,
            warnings,
        })
    }

    /// Remove the merchant's selection of a master product.
    ///
    /// Returns `true` if a selection was removed.
    ///
    /// # Errors
    ///
    /// Returns error if the database delete fails.
    pub async fn remove_selection(
        &self,
        merchant_id: MerchantId,
        master_product_id: MasterProductId,
    ) -> Result<bool, SmartAddError> {
        let removed =
            catalog::delete_selection(self.pool, merchant_id, master_product_id).await?;
        Ok(removed)
    }

    /// The merchant's profile, required for any catalog-gated operation.
    async fn onboarded_profile(
        &self,
        merchant_id: MerchantId,
    ) -> Result<MerchantProfile, SmartAddError> {
        MerchantRepository::new(self.pool)
            .get_profile(merchant_id)
            .await?
            .ok_or(SmartAddError::NotOnboarded)
    }

    /// The category must exist and carry the merchant's business category.
    async fn check_category(
        &self,
        category_id: MasterCategoryId,
        profile: &MerchantProfile,
    ) -> Result<(), SmartAddError> {
        let category = catalog::get_category(self.pool, category_id)
            .await?
            .ok_or(SmartAddError::InvalidCategory)?;

        if category.business_category != profile.business_category {
            return Err(SmartAddError::InvalidCategory);
        }

        Ok(())
    }
}
