//! Short code resolution through the cache and the link store.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, CachedLink, record_cache_error, ttl_until};

/// Outcome of resolving a short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Redirect to this destination.
    Redirect(String),
    /// No link was ever created for the code.
    NotFound,
    /// The link exists but has expired.
    Gone,
}

/// Resolves short codes to destinations.
///
/// Reads go to the cache first and fall back to the store. Expiry is
/// enforced on every resolution, cache hits included, and an expired link is
/// never written back to the cache.
pub struct RedirectService {
    link_repository: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
}

impl RedirectService {
    pub fn new(link_repository: Arc<dyn LinkRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self {
            link_repository,
            cache,
        }
    }

    /// Resolves a short code.
    ///
    /// # Flow
    ///
    /// 1. Cache hit that has not expired: redirect without touching the store
    /// 2. Cache hit that has expired: drop the entry, answer Gone
    /// 3. Miss or cache failure: read the store
    /// 4. Live link from the store: cache it for its remaining lifetime
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] only when the store lookup fails. Cache
    /// failures are logged and treated as misses.
    pub async fn resolve(&self, short_code: &str) -> Result<Resolution, AppError> {
        let now = Utc::now();

        match self.cache.get_link(short_code).await {
            Ok(Some(cached)) if !cached.is_expired_at(now) => {
                return Ok(Resolution::Redirect(cached.long_url));
            }
            Ok(Some(_)) => {
                debug!("Cached link {} has expired", short_code);
                if let Err(e) = self.cache.invalidate(short_code).await {
                    record_cache_error("invalidate", short_code, &e);
                }
                return Ok(Resolution::Gone);
            }
            Ok(None) => {}
            Err(e) => record_cache_error("get", short_code, &e),
        }

        let Some(link) = self.link_repository.find_by_code(short_code).await? else {
            debug!("Short code {} not found", short_code);
            return Ok(Resolution::NotFound);
        };

        if link.is_expired_at(now) {
            debug!("Link {} expired at {}", short_code, link.expires_at);
            return Ok(Resolution::Gone);
        }

        self.repopulate(&link, now).await;

        Ok(Resolution::Redirect(link.long_url))
    }

    async fn repopulate(&self, link: &Link, now: DateTime<Utc>) {
        let Some(ttl) = ttl_until(link.expires_at, now) else {
            return;
        };

        let cached = CachedLink::new(link.long_url.clone(), link.expires_at);
        if let Err(e) = self.cache.set_link(&link.short_code, &cached, ttl).await {
            record_cache_error("set", &link.short_code, &e);
        }
    }
}
