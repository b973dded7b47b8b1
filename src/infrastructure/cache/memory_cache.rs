//! In-process cache implementation.

use super::service::{CacheResult, CacheService, CachedLink};
use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::Expiry;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default entry bound of each key family when none is configured.
pub const DEFAULT_MEMORY_CACHE_CAPACITY: u64 = 100_000;

/// A cached value together with the TTL it was written with.
#[derive(Debug, Clone)]
struct Timed<T> {
    value: T,
    ttl: Duration,
    deadline: Instant,
}

impl<T> Timed<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            ttl,
            deadline: Instant::now() + ttl,
        }
    }
}

/// Expires every entry after the TTL it was inserted with.
struct WrittenTtl;

impl<T> Expiry<String, Timed<T>> for WrittenTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Timed<T>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Timed<T>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

fn build<T>(max_capacity: u64) -> Cache<String, Timed<T>>
where
    T: Clone + Send + Sync + 'static,
{
    Cache::builder()
        .max_capacity(max_capacity)
        .expire_after(WrittenTtl)
        .build()
}

/// Cache held in process memory.
///
/// Used when no Redis is configured, so it only serves a single instance.
/// Entries expire after the TTL given on write and each key family holds at
/// most `max_capacity` entries; least useful entries are evicted first.
pub struct MemoryCache {
    links: Cache<String, Timed<CachedLink>>,
    qr_images: Cache<String, Timed<Arc<[u8]>>>,
}

impl MemoryCache {
    pub fn new(max_capacity: u64) -> Self {
        debug!(max_capacity, "In-process cache initialized");
        Self {
            links: build(max_capacity),
            qr_images: build(max_capacity),
        }
    }

    /// Number of resolution entries after pending evictions have run.
    pub async fn link_count(&self) -> u64 {
        self.links.run_pending_tasks().await;
        self.links.entry_count()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_CACHE_CAPACITY)
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_link(&self, short_code: &str) -> CacheResult<Option<CachedLink>> {
        Ok(self.links.get(short_code).await.map(|e| e.value))
    }

    async fn set_link(
        &self,
        short_code: &str,
        link: &CachedLink,
        ttl: Duration,
    ) -> CacheResult<()> {
        self.links
            .insert(short_code.to_string(), Timed::new(link.clone(), ttl))
            .await;
        Ok(())
    }

    async fn link_ttl(&self, short_code: &str) -> CacheResult<Option<Duration>> {
        Ok(self
            .links
            .get(short_code)
            .await
            .map(|e| e.deadline.saturating_duration_since(Instant::now()))
            .filter(|ttl| !ttl.is_zero()))
    }

    async fn get_qr(&self, short_code: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(self
            .qr_images
            .get(short_code)
            .await
            .map(|e| e.value.to_vec()))
    }

    async fn set_qr(&self, short_code: &str, png: &[u8], ttl: Duration) -> CacheResult<()> {
        self.qr_images
            .insert(short_code.to_string(), Timed::new(Arc::from(png), ttl))
            .await;
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        self.links.invalidate(short_code).await;
        self.qr_images.invalidate(short_code).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn cached(url: &str) -> CachedLink {
        CachedLink::new(url, Utc::now() + chrono::Duration::hours(1))
    }

    #[tokio::test]
    async fn test_set_and_get_link() {
        let cache = MemoryCache::default();
        let link = cached("https://example.com");

        cache
            .set_link("abc123", &link, Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get_link("abc123").await.unwrap(), Some(link));
        assert!(cache.get_link("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = MemoryCache::default();

        cache
            .set_link("abc123", &cached("https://example.com"), Duration::from_millis(20))
            .await
            .unwrap();
        cache
            .set_qr("abc123", b"png", Duration::from_millis(20))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(cache.get_link("abc123").await.unwrap().is_none());
        assert!(cache.get_qr("abc123").await.unwrap().is_none());
        assert!(cache.link_ttl("abc123").await.unwrap().is_none());
        assert_eq!(cache.link_count().await, 0);
    }

    #[tokio::test]
    async fn test_expired_entries_are_evicted_without_reads() {
        let cache = MemoryCache::default();
        let link = cached("https://example.com");

        for i in 0..10_000 {
            cache
                .set_link(&format!("code{i}"), &link, Duration::from_millis(1))
                .await
                .unwrap();
        }

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(cache.link_count().await, 0);
    }

    #[tokio::test]
    async fn test_capacity_is_bounded() {
        let cache = MemoryCache::new(100);
        let link = cached("https://example.com");

        for i in 0..1_000 {
            cache
                .set_link(&format!("code{i}"), &link, Duration::from_secs(60))
                .await
                .unwrap();
        }

        assert!(cache.link_count().await <= 100);
    }

    #[tokio::test]
    async fn test_rewrite_resets_ttl() {
        let cache = MemoryCache::default();
        let link = cached("https://example.com");

        cache
            .set_link("abc123", &link, Duration::from_millis(20))
            .await
            .unwrap();
        cache
            .set_link("abc123", &link, Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(cache.get_link("abc123").await.unwrap(), Some(link));
    }

    #[tokio::test]
    async fn test_link_ttl_reports_remaining_time() {
        let cache = MemoryCache::default();

        assert!(cache.link_ttl("abc123").await.unwrap().is_none());

        cache
            .set_link("abc123", &cached("https://example.com"), Duration::from_secs(60))
            .await
            .unwrap();

        let ttl = cache.link_ttl("abc123").await.unwrap().unwrap();
        assert!(ttl <= Duration::from_secs(60));
        assert!(ttl > Duration::from_secs(58));
    }

    #[tokio::test]
    async fn test_link_and_qr_are_independent() {
        let cache = MemoryCache::default();

        cache
            .set_qr("abc123", b"\x89PNG", Duration::from_secs(60))
            .await
            .unwrap();

        assert!(cache.get_link("abc123").await.unwrap().is_none());
        assert_eq!(
            cache.get_qr("abc123").await.unwrap().as_deref(),
            Some(&b"\x89PNG"[..])
        );
    }

    #[tokio::test]
    async fn test_invalidate_removes_both_entries() {
        let cache = MemoryCache::default();

        cache
            .set_link("abc123", &cached("https://example.com"), Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set_qr("abc123", b"png", Duration::from_secs(60))
            .await
            .unwrap();

        cache.invalidate("abc123").await.unwrap();

        assert!(cache.get_link("abc123").await.unwrap().is_none());
        assert!(cache.get_qr("abc123").await.unwrap().is_none());
    }
}
