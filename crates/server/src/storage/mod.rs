//! Blob storage for product and profile images.
//!
//! The rest of the server treats storage as an opaque store of named blobs:
//! entities record a relative path (e.g. `merchant_products/7/<uuid>.jpg`)
//! and resolve it to bytes or a public URL through the [`BlobStore`] trait.
//! The filesystem implementation lives in [`fs`].

pub mod fs;

pub use fs::FsBlobStore;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during blob storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The blob does not exist.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// The path is empty, absolute, or escapes the storage root.
    #[error("invalid blob path: {0}")]
    InvalidPath(String),

    /// Underlying I/O failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An opaque store of named binary blobs.
///
/// Paths are relative, `/`-separated, and must not escape the store root.
/// Writes are single-attempt with no retry; callers decide whether a failure
/// is fatal or best-effort.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `bytes` to `path`, creating parent directories as needed.
    /// Overwrites any existing blob at the same path.
    async fn write(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Read the full contents of the blob at `path`.
    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Delete the blob at `path`. Fails with [`StorageError::NotFound`] if it
    /// does not exist.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Whether a blob exists at `path`.
    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Public URL at which the blob can be fetched.
    fn url(&self, path: &str) -> String;
}

/// Validate a relative blob path.
///
/// # Errors
///
/// Returns [`StorageError::InvalidPath`] for empty paths, absolute paths,
/// backslashes, or any `.`/`..` segment.
pub fn validate_path(path: &str) -> Result<(), StorageError> {
    if path.is_empty() {
        return Err(StorageError::InvalidPath(path.to_owned()));
    }

    if path.starts_with('/') || path.contains('\\') {
        return Err(StorageError::InvalidPath(path.to_owned()));
    }

    if path.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return Err(StorageError::InvalidPath(path.to_owned()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path_accepts_relative_paths() {
        assert!(validate_path("merchant_products/7/a.jpg").is_ok());
        assert!(validate_path("pending_products/12/b.png").is_ok());
        assert!(validate_path("top-level.bin").is_ok());
    }

    #[test]
    fn test_validate_path_rejects_empty() {
        assert!(matches!(
            validate_path(""),
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_validate_path_rejects_absolute() {
        assert!(validate_path("/etc/passwd").is_err());
    }

    #[test]
    fn test_validate_path_rejects_traversal() {
        assert!(validate_path("../outside").is_err());
        assert!(validate_path("a/../b").is_err());
        assert!(validate_path("a/./b").is_err());
    }

    #[test]
    fn test_validate_path_rejects_backslash_and_double_slash() {
        assert!(validate_path("a\\b").is_err());
        assert!(validate_path("a//b").is_err());
    }
}
