//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{LinkService, QrService, RedirectService};
use crate::domain::enrichment_worker::EnrichmentQueue;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::qr::QrRenderer;
use crate::utils::code_generator::CodeGenerator;

/// Settings the services need beyond their collaborators.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub link_lifetime: chrono::Duration,
    pub qr_size: u32,
}

/// Handles to the services behind the HTTP surface. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub qr_service: Arc<QrService>,
    pub enrichment_queue: EnrichmentQueue,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    /// Builds every service on top of one store, one cache and one queue.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        enrichment_queue: EnrichmentQueue,
        settings: ServiceSettings,
    ) -> Self {
        let link_service = LinkService::new(
            link_repository.clone(),
            cache.clone(),
            CodeGenerator::default(),
            settings.base_url.clone(),
            settings.link_lifetime,
        );
        let redirect_service = RedirectService::new(link_repository, cache.clone());
        let qr_service = QrService::new(
            cache.clone(),
            QrRenderer::new(settings.qr_size),
            settings.base_url,
        );

        Self {
            link_service: Arc::new(link_service),
            redirect_service: Arc::new(redirect_service),
            qr_service: Arc::new(qr_service),
            enrichment_queue,
            cache,
        }
    }
}
