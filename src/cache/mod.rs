//! Cache Module
//!
//! Backend-agnostic cache interface plus the in-memory backend.
//!
//! Call sites hold an `Arc<dyn Cache>` and never touch backend state
//! directly, so a distributed backend can replace the in-memory one without
//! changing them.

mod entry;
mod memory;
mod stats;
mod store;
mod ttl;

#[cfg(test)]
mod property_tests;

use async_trait::async_trait;

use crate::error::{CacheError, Result};

// Re-export public types
pub use entry::CacheEntry;
pub use memory::InMemoryCache;
pub use stats::CacheStats;
pub use store::MemoryStore;
pub use ttl::Ttl;

// == Capabilities ==
/// Optional operation families a backend supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// `set_add` / `set_members`
    pub sets: bool,
    /// `set_expiry`
    pub expiry_updates: bool,
}

// == Cache Interface ==
/// Contract every cache backend satisfies.
///
/// `get`, `set`, `delete` and `flush` are mandatory. The set-membership
/// family and `set_expiry` are optional: their provided implementations fail
/// with [`CacheError::Unsupported`], and backends that override them report
/// so through [`Cache::capabilities`].
#[async_trait]
pub trait Cache: Send + Sync {
    /// Short backend name used in errors and logs.
    fn backend(&self) -> &'static str;

    /// Optional operations this backend implements.
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// Inserts or overwrites `key`, replacing any previous TTL.
    async fn set(&self, key: &str, value: &str, ttl: Ttl) -> Result<()>;

    /// Returns the live value for `key`, or `NotFound`.
    async fn get(&self, key: &str) -> Result<String>;

    /// Removes `key`. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Removes every entry.
    async fn flush(&self) -> Result<()>;

    /// Like [`Cache::get`], with a missing key reported as `None`.
    async fn get_optional(&self, key: &str) -> Result<Option<String>> {
        match self.get(key).await {
            Ok(value) => Ok(Some(value)),
            Err(CacheError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Adds `members` to the set stored at `group`.
    async fn set_add(&self, _group: &str, _members: &[String]) -> Result<()> {
        Err(unsupported(self.backend(), "set_add"))
    }

    /// Lists the members of the set stored at `group`.
    async fn set_members(&self, _group: &str) -> Result<Vec<String>> {
        Err(unsupported(self.backend(), "set_members"))
    }

    /// Changes the expiry of an existing key without touching its value.
    ///
    /// Implementations fail with `NotFound` when the key has no live entry.
    async fn set_expiry(&self, _key: &str, _ttl: Ttl) -> Result<()> {
        Err(unsupported(self.backend(), "set_expiry"))
    }
}

fn unsupported(backend: &'static str, operation: &'static str) -> CacheError {
    CacheError::Unsupported { backend, operation }
}
