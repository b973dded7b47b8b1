//! Caching layer for fast redirect lookups and QR images.
//!
//! Provides a [`CacheService`] trait with three implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`MemoryCache`] - In-process cache used when no Redis is configured
//! - [`NullCache`] - No-op fallback when Redis is configured but unreachable

mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;

pub use memory_cache::{DEFAULT_MEMORY_CACHE_CAPACITY, MemoryCache};
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{
    CacheError, CacheResult, CacheService, CachedLink, record_cache_error, ttl_until,
};

#[cfg(test)]
pub use service::MockCacheService;
