//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService, CachedLink};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

const LINK_PREFIX: &str = "link:";
const QR_PREFIX: &str = "qr:";

/// Redis cache shared by every service instance.
///
/// Uses `ConnectionManager` for automatic reconnects; each call works on a
/// cheap clone of the manager. Errors are returned to the caller, which
/// decides how to degrade.
pub struct RedisCache {
    client: ConnectionManager,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self { client: manager })
    }

    fn link_key(short_code: &str) -> String {
        format!("{}{}", LINK_PREFIX, short_code)
    }

    fn qr_key(short_code: &str) -> String {
        format!("{}{}", QR_PREFIX, short_code)
    }
}

fn op_error(op: &str, key: &str, e: redis::RedisError) -> CacheError {
    CacheError::OperationError(format!("Redis {} {} failed: {}", op, key, e))
}

/// Interprets a Redis `TTL` reply: `-2` missing key, `-1` no expiry.
fn ttl_from_reply(seconds: i64) -> Option<Duration> {
    (seconds > 0).then(|| Duration::from_secs(seconds as u64))
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_link(&self, short_code: &str) -> CacheResult<Option<CachedLink>> {
        let key = Self::link_key(short_code);
        let mut conn = self.client.clone();

        let raw: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| op_error("GET", &key, e))?;

        match raw {
            Some(json) => {
                let link = serde_json::from_str(&json)
                    .map_err(|e| CacheError::Corrupt(format!("{}: {}", key, e)))?;
                debug!("Cache HIT: {}", short_code);
                Ok(Some(link))
            }
            None => {
                debug!("Cache MISS: {}", short_code);
                Ok(None)
            }
        }
    }

    async fn set_link(
        &self,
        short_code: &str,
        link: &CachedLink,
        ttl: Duration,
    ) -> CacheResult<()> {
        let key = Self::link_key(short_code);
        let value = serde_json::to_string(link)
            .map_err(|e| CacheError::OperationError(format!("Failed to encode {}: {}", key, e)))?;
        let mut conn = self.client.clone();

        conn.set_ex::<_, _, ()>(&key, value, ttl.as_secs())
            .await
            .map_err(|e| op_error("SET", &key, e))?;

        debug!("Cache SET: {} (TTL: {}s)", short_code, ttl.as_secs());
        Ok(())
    }

    async fn link_ttl(&self, short_code: &str) -> CacheResult<Option<Duration>> {
        let key = Self::link_key(short_code);
        let mut conn = self.client.clone();

        let seconds: i64 = conn
            .ttl(&key)
            .await
            .map_err(|e| op_error("TTL", &key, e))?;

        Ok(ttl_from_reply(seconds))
    }

    async fn get_qr(&self, short_code: &str) -> CacheResult<Option<Vec<u8>>> {
        let key = Self::qr_key(short_code);
        let mut conn = self.client.clone();

        conn.get::<_, Option<Vec<u8>>>(&key)
            .await
            .map_err(|e| op_error("GET", &key, e))
    }

    async fn set_qr(&self, short_code: &str, png: &[u8], ttl: Duration) -> CacheResult<()> {
        let key = Self::qr_key(short_code);
        let mut conn = self.client.clone();

        conn.set_ex::<_, _, ()>(&key, png, ttl.as_secs())
            .await
            .map_err(|e| op_error("SET", &key, e))?;

        debug!("Cache SET QR: {} (TTL: {}s)", short_code, ttl.as_secs());
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        let keys = [Self::link_key(short_code), Self::qr_key(short_code)];
        let mut conn = self.client.clone();

        let deleted: i32 = conn
            .del(&keys[..])
            .await
            .map_err(|e| op_error("DEL", &keys[0], e))?;

        if deleted > 0 {
            debug!("Cache INVALIDATE: {}", short_code);
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
