//! QR images for short links, cached for the link's remaining lifetime.

use std::sync::Arc;
use tracing::{debug, error};

use crate::application::services::link_service::build_short_url;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, record_cache_error};
use crate::infrastructure::qr::QrRenderer;

/// Serves PNG QR codes that encode a short link's public URL.
///
/// A rendered image is cached only while the link's resolution entry is
/// cached, and never longer than that entry's remaining TTL.
pub struct QrService {
    cache: Arc<dyn CacheService>,
    renderer: QrRenderer,
    base_url: String,
}

impl QrService {
    pub fn new(cache: Arc<dyn CacheService>, renderer: QrRenderer, base_url: impl Into<String>) -> Self {
        Self {
            cache,
            renderer,
            base_url: base_url.into(),
        }
    }

    /// Returns the PNG QR code for `short_code`.
    ///
    /// The code itself is not looked up: the image only encodes
    /// `{base_url}/{short_code}`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RenderFailed`] if the image cannot be rendered.
    /// Cache failures never fail the call.
    pub async fn get_qr_image(&self, short_code: &str) -> Result<Vec<u8>, AppError> {
        match self.cache.get_qr(short_code).await {
            Ok(Some(png)) => {
                debug!("QR cache HIT: {}", short_code);
                return Ok(png);
            }
            Ok(None) => debug!("QR cache MISS: {}", short_code),
            Err(e) => record_cache_error("get_qr", short_code, &e),
        }

        let content = build_short_url(&self.base_url, short_code);
        let png = self.renderer.render(&content).map_err(|e| {
            error!("QR rendering failed for {}: {}", short_code, e);
            AppError::RenderFailed(e.to_string())
        })?;

        match self.cache.link_ttl(short_code).await {
            Ok(Some(ttl)) => {
                if let Err(e) = self.cache.set_qr(short_code, &png, ttl).await {
                    record_cache_error("set_qr", short_code, &e);
                }
            }
            Ok(None) => debug!("No cached link TTL for {}, QR left uncached", short_code),
            Err(e) => record_cache_error("ttl", short_code, &e),
        }

        Ok(png)
    }
}
