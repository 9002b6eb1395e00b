//! Filesystem-backed blob store.

use std::path::PathBuf;

use async_trait::async_trait;

use super::{BlobStore, StorageError, validate_path};

/// Blob store rooted at a local media directory.
///
/// Blobs are plain files under the root; the server exposes the root at
/// `/media` so [`FsBlobStore::url`] joins the public base URL with
/// `/media/<path>`.
pub struct FsBlobStore {
    root: PathBuf,
    public_base: String,
}

impl FsBlobStore {
    /// Create a store rooted at `root`, with URLs served under
    /// `{public_base}/media/`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, public_base: &str) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.trim_end_matches('/').to_owned(),
        }
    }

    /// Resolve a validated relative path against the store root.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        validate_path(path)?;
        Ok(self.root.join(path))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn write(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, bytes).await?;
        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full = self.resolve(path)?;
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_owned()))
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_owned()))
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let full = self.resolve(path)?;
        Ok(tokio::fs::try_exists(&full).await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/media/{path}", self.public_base)
    }
}

impl std::fmt::Debug for FsBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsBlobStore")
            .field("root", &self.root)
            .field("public_base", &self.public_base)
            .finish()
    }
}

/// Helper for tests: a unique temp directory that is removed on drop.
#[cfg(test)]
pub(crate) struct TempRoot(pub PathBuf);

#[cfg(test)]
impl TempRoot {
    pub fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("bodega-store-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp root");
        Self(dir)
    }

    pub fn path(&self) -> &std::path::Path {
        &self.0
    }
}

#[cfg(test)]
impl Drop for TempRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_read_roundtrip() {
        let root = TempRoot::new();
        let store = FsBlobStore::new(root.path(), "http://localhost:8000");

        store
            .write("merchant_products/1/a.jpg", b"image-bytes")
            .await
            .unwrap();
        let bytes = store.read("merchant_products/1/a.jpg").await.unwrap();
        assert_eq!(bytes, b"image-bytes");
    }

    #[tokio::test]
    async fn test_exists_and_delete() {
        let root = TempRoot::new();
        let store = FsBlobStore::new(root.path(), "http://localhost:8000");

        assert!(!store.exists("pending_products/2/b.png").await.unwrap());
        store.write("pending_products/2/b.png", b"x").await.unwrap();
        assert!(store.exists("pending_products/2/b.png").await.unwrap());

        store.delete("pending_products/2/b.png").await.unwrap();
        assert!(!store.exists("pending_products/2/b.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let root = TempRoot::new();
        let store = FsBlobStore::new(root.path(), "http://localhost:8000");

        let err = store.read("nope.bin").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let root = TempRoot::new();
        let store = FsBlobStore::new(root.path(), "http://localhost:8000");

        let err = store.delete("nope.bin").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_traversal_rejected() {
        let root = TempRoot::new();
        let store = FsBlobStore::new(root.path(), "http://localhost:8000");

        let err = store.read("../outside").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidPath(_)));
    }

    #[test]
    fn test_url_joins_base() {
        let store = FsBlobStore::new("media", "http://localhost:8000/");
        assert_eq!(
            store.url("merchant_products/1/a.jpg"),
            "http://localhost:8000/media/merchant_products/1/a.jpg"
        );
    }
}
