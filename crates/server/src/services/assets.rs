//! Image copy and migration between blob storage locations.
//!
//! Destination filenames are always freshly generated UUIDs (retaining the
//! source extension), so two writes can never collide on a name. Migration
//! is strictly copy-then-delete: the source is only removed after the
//! destination write has been confirmed, so a mid-copy failure can never
//! lose the image.

use bodega_core::MerchantId;
use thiserror::Error;
use uuid::Uuid;

use crate::storage::{BlobStore, StorageError};

/// Storage prefix for live product images.
pub const PRODUCT_IMAGE_PREFIX: &str = "merchant_products";
/// Storage prefix for pending-submission images.
pub const PENDING_IMAGE_PREFIX: &str = "pending_products";
/// Storage prefix for merchant profile/banner images.
pub const PROFILE_IMAGE_PREFIX: &str = "merchant_profiles";

/// Errors that can occur while copying or migrating an image.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The source blob does not exist.
    #[error("source image missing: {0}")]
    SourceMissing(String),

    /// Underlying storage failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Build a destination path under `prefix` for a merchant, with a fresh
/// UUID filename keeping the source's extension.
fn destination_path(prefix: &str, merchant_id: MerchantId, source: &str) -> String {
    let filename = match source.rsplit('.').next().filter(|ext| {
        !ext.contains('/') && !ext.is_empty() && ext.len() <= 8
    }) {
        Some(ext) if source.contains('.') => format!("{}.{ext}", Uuid::new_v4()),
        _ => Uuid::new_v4().to_string(),
    };
    format!("{prefix}/{merchant_id}/{filename}")
}

/// Copy an image to a merchant's product-image location, retaining the
/// source. Used for shared sources (master product images).
///
/// Returns the new blob reference.
///
/// # Errors
///
/// Returns `AssetError::SourceMissing` if the source blob does not exist,
/// or `AssetError::Storage` if the read or write fails.
pub async fn copy_image(
    store: &dyn BlobStore,
    source: &str,
    merchant_id: MerchantId,
) -> Result<String, AssetError> {
    if !store.exists(source).await? {
        return Err(AssetError::SourceMissing(source.to_owned()));
    }

    let bytes = store.read(source).await?;
    let dest = destination_path(PRODUCT_IMAGE_PREFIX, merchant_id, source);
    store.write(&dest, &bytes).await?;

    Ok(dest)
}

/// Migrate an image to a merchant's product-image location: copy the bytes,
/// then delete the source. The source is left intact if the copy fails.
///
/// Returns the new blob reference.
///
/// # Errors
///
/// Returns `AssetError::SourceMissing` if the source blob does not exist,
/// or `AssetError::Storage` if any storage step fails. A delete failure
/// after a successful copy is reported, with the source still present.
pub async fn migrate_image(
    store: &dyn BlobStore,
    source: &str,
    merchant_id: MerchantId,
) -> Result<String, AssetError> {
    let dest = copy_image(store, source, merchant_id).await?;
    store.delete(source).await?;

    Ok(dest)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::storage::validate_path;

    /// In-memory blob store with optional write-failure injection.
    #[derive(Default)]
    struct MemoryBlobStore {
        blobs: Mutex<HashMap<String, Vec<u8>>>,
        fail_writes: bool,
    }

    impl MemoryBlobStore {
        fn with_blob(path: &str, bytes: &[u8]) -> Self {
            let store = Self::default();
            store
                .blobs
                .lock()
                .unwrap()
                .insert(path.to_owned(), bytes.to_vec());
            store
        }

        fn failing_writes(path: &str, bytes: &[u8]) -> Self {
            let mut store = Self::with_blob(path, bytes);
            store.fail_writes = true;
            store
        }
    }

    #[async_trait]
    impl BlobStore for MemoryBlobStore {
        async fn write(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
            validate_path(path)?;
            if self.fail_writes {
                return Err(StorageError::Io(std::io::Error::other("disk full")));
            }
            self.blobs
                .lock()
                .unwrap()
                .insert(path.to_owned(), bytes.to_vec());
            Ok(())
        }

        async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
            self.blobs
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| StorageError::NotFound(path.to_owned()))
        }

        async fn delete(&self, path: &str) -> Result<(), StorageError> {
            self.blobs
                .lock()
                .unwrap()
                .remove(path)
                .map(|_| ())
                .ok_or_else(|| StorageError::NotFound(path.to_owned()))
        }

        async fn exists(&self, path: &str) -> Result<bool, StorageError> {
            Ok(self.blobs.lock().unwrap().contains_key(path))
        }

        fn url(&self, path: &str) -> String {
            format!("memory://{path}")
        }
    }

    const SOURCE: &str = "pending_products/3/original.jpg";

    #[tokio::test]
    async fn test_migrate_moves_bytes_to_merchant_location() {
        let store = MemoryBlobStore::with_blob(SOURCE, b"jpeg-bytes");

        let dest = migrate_image(&store, SOURCE, bodega_core::MerchantId::new(7))
            .await
            .unwrap();

        assert!(dest.starts_with("merchant_products/7/"));
        assert!(dest.ends_with(".jpg"));
        assert_eq!(store.read(&dest).await.unwrap(), b"jpeg-bytes");
        // Source removed only after the copy succeeded
        assert!(!store.exists(SOURCE).await.unwrap());
    }

    #[tokio::test]
    async fn test_migrate_failed_copy_leaves_source_intact() {
        let store = MemoryBlobStore::failing_writes(SOURCE, b"jpeg-bytes");

        let err = migrate_image(&store, SOURCE, bodega_core::MerchantId::new(7))
            .await
            .unwrap_err();

        assert!(matches!(err, AssetError::Storage(_)));
        assert!(store.exists(SOURCE).await.unwrap());
        assert_eq!(store.read(SOURCE).await.unwrap(), b"jpeg-bytes");
    }

    #[tokio::test]
    async fn test_copy_retains_source() {
        let store = MemoryBlobStore::with_blob("master_product_images/tea.png", b"png-bytes");

        let dest = copy_image(
            &store,
            "master_product_images/tea.png",
            bodega_core::MerchantId::new(4),
        )
        .await
        .unwrap();

        assert!(dest.starts_with("merchant_products/4/"));
        assert!(dest.ends_with(".png"));
        assert!(store.exists("master_product_images/tea.png").await.unwrap());
        assert_eq!(store.read(&dest).await.unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn test_missing_source_reported() {
        let store = MemoryBlobStore::default();

        let err = migrate_image(&store, "pending_products/1/gone.jpg", 1.into())
            .await
            .unwrap_err();

        assert!(matches!(err, AssetError::SourceMissing(_)));
    }

    #[tokio::test]
    async fn test_destination_names_never_collide() {
        let store = MemoryBlobStore::with_blob(SOURCE, b"a");

        let first = copy_image(&store, SOURCE, 7.into()).await.unwrap();
        let second = copy_image(&store, SOURCE, 7.into()).await.unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_destination_path_without_extension() {
        let path = destination_path(PRODUCT_IMAGE_PREFIX, 2.into(), "pending_products/2/raw");
        assert!(path.starts_with("merchant_products/2/"));
        assert!(!path.ends_with(".raw"));
    }
}
