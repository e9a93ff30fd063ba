//! TTL Module
//!
//! Expresses how long a written entry should live.

use std::time::Duration;

// == Ttl ==
/// Expiration requested for a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ttl {
    /// Use the instance's configured default expiration
    #[default]
    Default,
    /// Never expire
    Never,
    /// Expire this long after the write; a zero duration behaves like `Default`
    After(Duration),
}

impl Ttl {
    /// TTL of the given number of seconds.
    pub fn seconds(secs: u64) -> Self {
        Ttl::After(Duration::from_secs(secs))
    }

    /// TTL of the given number of minutes.
    pub fn minutes(mins: u64) -> Self {
        Ttl::After(Duration::from_secs(mins.saturating_mul(60)))
    }

    /// Resolves to a concrete lifetime against a backend default.
    ///
    /// `None` means the entry never expires.
    pub fn resolve(self, default: Option<Duration>) -> Option<Duration> {
        match self {
            Ttl::Default => default,
            Ttl::Never => None,
            Ttl::After(d) if d.is_zero() => default,
            Ttl::After(d) => Some(d),
        }
    }
}

impl From<Duration> for Ttl {
    fn from(d: Duration) -> Self {
        Ttl::After(d)
    }
}
