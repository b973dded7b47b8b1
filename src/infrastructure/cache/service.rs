//! Cache service trait and error types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),

    #[error("Cache entry is corrupt: {0}")]
    Corrupt(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Resolution data cached for a short code.
///
/// Carries the link's expiry so a cache hit can be checked for expiry
/// without a store round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedLink {
    pub long_url: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedLink {
    pub fn new(long_url: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            long_url: long_url.into(),
            expires_at,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// TTL for an entry that must not outlive `expires_at`.
///
/// Floored to whole seconds. Returns `None` when less than one second is
/// left, in which case nothing should be cached.
pub fn ttl_until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<Duration> {
    let seconds = (expires_at - now).num_seconds();
    (seconds > 0).then(|| Duration::from_secs(seconds as u64))
}

/// Logs and counts a cache failure that the caller absorbs.
pub fn record_cache_error(op: &'static str, short_code: &str, error: &CacheError) {
    warn!(op, short_code, error = %error, "Cache unavailable, continuing without it");
    metrics::counter!("linkchop_cache_errors_total", "op" => op).increment(1);
}

/// Key/value cache in front of the link store.
///
/// Holds two independent kinds of entries per short code: the resolution
/// data ([`CachedLink`]) and the rendered QR image. Every write takes an
/// explicit TTL; callers derive it with [`ttl_until`].
///
/// Implementations report failures as [`CacheError`]. Callers treat any
/// error as a miss (reads) or a skipped write; a cache failure never fails a
/// request.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed, shared across instances
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process, for single-node setups and tests
/// - [`crate::infrastructure::cache::NullCache`] - No-op, used when Redis is unreachable
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Reads the resolution entry for a short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(link))` on cache hit
    /// - `Ok(None)` on cache miss
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend is unreachable or the stored
    /// value cannot be decoded.
    async fn get_link(&self, short_code: &str) -> CacheResult<Option<CachedLink>>;

    /// Stores the resolution entry with the given TTL.
    async fn set_link(&self, short_code: &str, link: &CachedLink, ttl: Duration)
    -> CacheResult<()>;

    /// Remaining TTL of the resolution entry.
    ///
    /// `Ok(None)` when the entry is missing or has no expiry.
    async fn link_ttl(&self, short_code: &str) -> CacheResult<Option<Duration>>;

    /// Reads the cached QR image for a short code.
    async fn get_qr(&self, short_code: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Stores a rendered QR image with the given TTL.
    async fn set_qr(&self, short_code: &str, png: &[u8], ttl: Duration) -> CacheResult<()>;

    /// Removes both entries for a short code.
    async fn invalidate(&self, short_code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by health check endpoints to report cache status.
    async fn health_check(&self) -> bool;
}
