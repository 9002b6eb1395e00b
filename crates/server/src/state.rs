//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::storage::{BlobStore, FsBlobStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool, blob store, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    store: Arc<dyn BlobStore>,
}

impl AppState {
    /// Create a new application state with the filesystem blob store rooted
    /// at the configured media directory.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let store: Arc<dyn BlobStore> =
            Arc::new(FsBlobStore::new(config.media_root.clone(), &config.base_url));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                store,
            }),
        }
    }

    /// Create a state with a specific blob store (used by tests).
    #[must_use]
    pub fn with_store(config: ServerConfig, pool: PgPool, store: Arc<dyn BlobStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                store,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the blob store.
    #[must_use]
    pub fn store(&self) -> &dyn BlobStore {
        self.inner.store.as_ref()
    }
}
