//! No-op cache implementation.

use super::service::{CacheResult, CacheService, CachedLink};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Used when Redis is configured but unreachable at startup. Every read
/// misses and every write succeeds without storing anything, so resolution
/// always falls through to the store.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_link(&self, _short_code: &str) -> CacheResult<Option<CachedLink>> {
        Ok(None)
    }

    async fn set_link(
        &self,
        _short_code: &str,
        _link: &CachedLink,
        _ttl: Duration,
    ) -> CacheResult<()> {
        Ok(())
    }

    async fn link_ttl(&self, _short_code: &str) -> CacheResult<Option<Duration>> {
        Ok(None)
    }

    async fn get_qr(&self, _short_code: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn set_qr(&self, _short_code: &str, _png: &[u8], _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _short_code: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
