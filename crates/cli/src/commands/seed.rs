//! Seed the master catalog from a YAML file.
//!
//! The file lists categories (each tagged with a business category) and the
//! products under them. Categories are matched by name and created when
//! missing; products that already exist with the same name, brand, and
//! category are skipped, so reseeding is safe.
//!
//! ```yaml
//! categories:
//!   - name: Pantry
//!     business_category: Grocery
//!     products:
//!       - name: Organic Honey
//!         brand: Hillside
//!         description: 500g jar
//!         image: master_product_images/honey.jpg
//! ```
//!
//! # Environment Variables
//!
//! - `BODEGA_DATABASE_URL` - `PostgreSQL` connection string

use std::path::Path;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

use bodega_core::BusinessCategory;
use bodega_server::db::{self, RepositoryError, catalog};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// The catalog file could not be read.
    #[error("Cannot read file {0}: {1}")]
    File(String, std::io::Error),

    /// The catalog file is not valid YAML.
    #[error("Invalid catalog file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A category carries an unknown business category.
    #[error("Category '{0}': {1}")]
    BadBusinessCategory(String, bodega_core::BusinessCategoryError),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository failure.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// The catalog file layout.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    categories: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    name: String,
    business_category: String,
    #[serde(default)]
    products: Vec<ProductEntry>,
}

#[derive(Debug, Deserialize)]
struct ProductEntry {
    name: String,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    description: String,
    /// Blob reference of a pre-placed image under the media root.
    #[serde(default)]
    image: Option<String>,
}

/// Seed master categories and products from `file_path`.
///
/// # Errors
///
/// Returns `SeedError` if the file is unreadable/invalid or the database is
/// unreachable. Individual duplicate products are skipped, not errors.
pub async fn catalog(file_path: &str) -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let path = Path::new(file_path);
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SeedError::File(file_path.to_owned(), e))?;
    let file: CatalogFile = serde_yaml::from_str(&content)?;

    // Validate every business category before touching the database.
    let mut entries = Vec::with_capacity(file.categories.len());
    for category in file.categories {
        let business = BusinessCategory::parse(&category.business_category)
            .map_err(|e| SeedError::BadBusinessCategory(category.name.clone(), e))?;
        entries.push((category, business));
    }

    let database_url = std::env::var("BODEGA_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| SeedError::MissingEnvVar("BODEGA_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    let mut created = 0usize;
    let mut skipped = 0usize;

    for (entry, business) in entries {
        let category = catalog::get_or_create_category(&pool, entry.name.trim(), business).await?;
        tracing::info!(category = %category.name, "seeding category");

        for product in entry.products {
            let name = product.name.trim();
            let brand = product.brand.as_deref().map(str::trim).filter(|b| !b.is_empty());

            if catalog::master_product_exists(&pool, name, brand, category.id).await? {
                tracing::info!(product = %name, "skipping duplicate");
                skipped += 1;
                continue;
            }

            catalog::create_master_product(
                &pool,
                name,
                brand,
                product.description.trim(),
                product.image.as_deref(),
                category.id,
            )
            .await?;
            created += 1;
        }
    }

    tracing::info!("Seed complete: {created} products created, {skipped} skipped");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_file() {
        let yaml = r"
categories:
  - name: Pantry
    business_category: Grocery
    products:
      - name: Organic Honey
        brand: Hillside
        description: 500g jar
      - name: Basmati Rice
  - name: Sarees
    business_category: Fashion
";
        let file: CatalogFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.categories.len(), 2);
        assert_eq!(file.categories[0].products.len(), 2);
        assert!(file.categories[0].products[1].brand.is_none());
        assert!(file.categories[1].products.is_empty());
    }

    #[test]
    fn test_unknown_business_category_is_rejected() {
        assert!(BusinessCategory::parse("Automotive").is_err());
    }
}
