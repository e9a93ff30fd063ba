//! Application State
//!
//! Owns the single shared cache handle for the lifetime of the service.

use std::sync::Arc;

use crate::cache::{Cache, InMemoryCache};
use crate::config::InMemoryConfig;
use crate::error::Result;

/// State shared by everything that talks to the cache.
///
/// Cloning is cheap; every clone refers to the same backend. When the last
/// clone is dropped the backend is dropped with it, which stops its sweep.
#[derive(Clone)]
pub struct AppState {
    /// Backend-agnostic cache handle
    pub cache: Arc<dyn Cache>,
}

impl AppState {
    /// Wraps an already constructed backend.
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    /// Builds the in-memory backend from configuration.
    pub fn from_config(config: &InMemoryConfig) -> Result<Self> {
        let cache = InMemoryCache::new(config)?;
        Ok(Self::new(Arc::new(cache)))
    }
}
