//! Service Cache - backend-agnostic caching for a small web service
//!
//! Provides a `Cache` trait with an in-memory backend supporting per-entry
//! TTL, lazy expiry and a background expiry sweep.

pub mod cache;
pub mod config;
pub mod error;
pub mod state;
pub mod tasks;

pub use cache::{Cache, Capabilities, InMemoryCache, Ttl};
pub use config::InMemoryConfig;
pub use error::{CacheError, Result};
pub use state::AppState;
