//! In-Memory Backend
//!
//! `Cache` implementation over a locked [`MemoryStore`] with a background
//! expiry sweep.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::{Cache, CacheStats, MemoryStore, Ttl};
use crate::config::InMemoryConfig;
use crate::error::Result;
use crate::tasks::{spawn_sweep, SweepHandle};

// == In-Memory Cache ==
/// Process-local cache backend.
///
/// All access goes through one `RwLock`, so operations on a key are
/// linearizable. Only scalar string values are supported; the set family and
/// `set_expiry` fail with [`CacheError::Unsupported`].
///
/// Dropping the cache stops its sweep task.
#[derive(Debug)]
pub struct InMemoryCache {
    store: Arc<RwLock<MemoryStore>>,
    sweeper: Option<SweepHandle>,
}

impl InMemoryCache {
    /// Backend name reported by [`Cache::backend`].
    pub const BACKEND: &'static str = "in-memory";

    // == Constructor ==
    /// Creates a cache instance from `config`.
    ///
    /// A non-zero cleanup interval starts the sweep: as a task when called
    /// inside a Tokio runtime, otherwise on a dedicated thread.
    ///
    /// # Errors
    /// - `InvalidConfig` for negative minute counts
    pub fn new(config: &InMemoryConfig) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(RwLock::new(MemoryStore::new(config.default_expiration())));

        let sweeper = config
            .cleanup_interval()
            .and_then(|interval| spawn_sweep(&store, interval));

        info!(
            "In-memory cache created: default_expiration={}m, cleanup_interval={}m",
            config.default_expiration, config.cleanup_interval
        );

        Ok(Self { store, sweeper })
    }

    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Returns true if no entries are stored.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Returns true while the background sweep task is running.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper.as_ref().is_some_and(SweepHandle::is_running)
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    fn backend(&self) -> &'static str {
        Self::BACKEND
    }

    async fn set(&self, key: &str, value: &str, ttl: Ttl) -> Result<()> {
        self.store
            .write()
            .await
            .set(key.to_string(), value.to_string(), ttl);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<String> {
        // Write lock: a read may evict an expired entry and updates stats
        self.store.write().await.get(key)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.store.write().await.delete(key);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        let removed = self.store.write().await.flush();
        debug!("Flushed {} entries from in-memory cache", removed);
        Ok(())
    }
}

impl Drop for InMemoryCache {
    fn drop(&mut self) {
        if let Some(mut handle) = self.sweeper.take() {
            handle.stop();
            debug!("Expiry sweep stopped");
        }
    }
}
