//! Configuration Module
//!
//! Handles loading and validating cache configuration from environment variables.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

const ENV_DEFAULT_EXPIRATION: &str = "CACHE_DEFAULT_EXPIRATION";
const ENV_CLEANUP_INTERVAL: &str = "CACHE_CLEANUP_INTERVAL";

/// In-memory backend configuration.
///
/// Both values are whole minutes. Zero has a special meaning for each:
/// a zero default expiration means entries written with [`Ttl::Default`]
/// never expire, and a zero cleanup interval disables the background sweep.
///
/// [`Ttl::Default`]: crate::cache::Ttl::Default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryConfig {
    /// Expiration in minutes applied when `set` is called without an explicit TTL
    pub default_expiration: i32,
    /// Minutes between background sweeps of expired entries
    pub cleanup_interval: i32,
}

impl InMemoryConfig {
    /// Creates a config from minute counts.
    pub fn new(default_expiration: i32, cleanup_interval: i32) -> Self {
        Self {
            default_expiration,
            cleanup_interval,
        }
    }

    /// Loads the config from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DEFAULT_EXPIRATION` - Default expiration in minutes (default: 5)
    /// - `CACHE_CLEANUP_INTERVAL` - Sweep interval in minutes (default: 10)
    ///
    /// A variable that is set but not a non-negative integer is an
    /// [`CacheError::InvalidConfig`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            default_expiration: parse_minutes(
                ENV_DEFAULT_EXPIRATION,
                lookup(ENV_DEFAULT_EXPIRATION),
                defaults.default_expiration,
            )?,
            cleanup_interval: parse_minutes(
                ENV_CLEANUP_INTERVAL,
                lookup(ENV_CLEANUP_INTERVAL),
                defaults.cleanup_interval,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects negative minute counts.
    pub fn validate(&self) -> Result<()> {
        if self.default_expiration < 0 {
            return Err(CacheError::InvalidConfig(format!(
                "default_expiration must be >= 0 minutes, got {}",
                self.default_expiration
            )));
        }
        if self.cleanup_interval < 0 {
            return Err(CacheError::InvalidConfig(format!(
                "cleanup_interval must be >= 0 minutes, got {}",
                self.cleanup_interval
            )));
        }
        Ok(())
    }

    /// Default expiration as a duration, `None` meaning "never expires".
    pub fn default_expiration(&self) -> Option<Duration> {
        minutes(self.default_expiration)
    }

    /// Sweep period, `None` meaning "no background sweep".
    pub fn cleanup_interval(&self) -> Option<Duration> {
        minutes(self.cleanup_interval)
    }
}

impl Default for InMemoryConfig {
    fn default() -> Self {
        Self {
            default_expiration: 5,
            cleanup_interval: 10,
        }
    }
}

fn minutes(value: i32) -> Option<Duration> {
    u64::try_from(value)
        .ok()
        .filter(|m| *m > 0)
        .map(|m| Duration::from_secs(m * 60))
}

fn parse_minutes(name: &str, raw: Option<String>, default: i32) -> Result<i32> {
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<i32>().map_err(|_| {
            CacheError::InvalidConfig(format!(
                "{} must be an integer minute count, got '{}'",
                name, raw
            ))
        }),
    }
}
