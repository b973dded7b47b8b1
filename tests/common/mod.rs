#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::connect_info::MockConnectInfo;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use linkchop::domain::entities::{GeoLocation, NewLink};
use linkchop::domain::enrichment_worker::EnrichmentWorkers;
use linkchop::domain::repositories::LinkRepository;
use linkchop::infrastructure::cache::MemoryCache;
use linkchop::infrastructure::geo::{GeoError, GeoLocator};
use linkchop::infrastructure::persistence::{MemoryAnalyticsRepository, MemoryLinkRepository};
use linkchop::routes::app_router;
use linkchop::state::{AppState, ServiceSettings};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const BASE_URL: &str = "http://sho.rt";

/// Public peer address the test server sees for every request.
pub const PEER_ADDR: &str = "203.0.113.50:40000";

/// Geolocator answering a fixed location and counting lookups.
#[derive(Default)]
pub struct StubLocator {
    calls: AtomicUsize,
}

impl StubLocator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoLocator for StubLocator {
    async fn locate(&self, _ip: IpAddr) -> Result<GeoLocation, GeoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GeoLocation::from_parts(
            Some("Testland"),
            Some("North"),
            Some("Testville"),
        ))
    }
}

/// A fully wired in-memory application.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub links: Arc<MemoryLinkRepository>,
    pub analytics: Arc<MemoryAnalyticsRepository>,
    pub cache: Arc<MemoryCache>,
    pub locator: Arc<StubLocator>,
    pub workers: EnrichmentWorkers,
}

impl TestApp {
    /// Waits until every queued redirect event has been processed.
    pub async fn drain(self) -> (Arc<MemoryAnalyticsRepository>, Arc<StubLocator>) {
        self.workers.shutdown().await;
        (self.analytics, self.locator)
    }
}

pub fn create_test_app() -> TestApp {
    let links = Arc::new(MemoryLinkRepository::new());
    let analytics = Arc::new(MemoryAnalyticsRepository::new());
    let cache = Arc::new(MemoryCache::new(1_000));
    let locator = Arc::new(StubLocator::default());

    let enrichment = Arc::new(linkchop::application::services::EnrichmentService::new(
        analytics.clone(),
        locator.clone(),
        std::time::Duration::from_secs(1),
    ));
    let (queue, workers) = EnrichmentWorkers::start(enrichment, 100, 2);

    let state = AppState::new(
        links.clone(),
        cache.clone(),
        queue,
        ServiceSettings {
            base_url: BASE_URL.to_string(),
            link_lifetime: Duration::days(90),
            qr_size: 128,
        },
    );

    let peer: SocketAddr = PEER_ADDR.parse().unwrap();
    let app = app_router(state.clone()).layer(MockConnectInfo(peer));
    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        state,
        links,
        analytics,
        cache,
        locator,
        workers,
    }
}

/// Inserts a link directly into the store, bypassing the cache.
pub async fn insert_link(
    links: &MemoryLinkRepository,
    code: &str,
    url: &str,
    lifetime: Duration,
) {
    let now = Utc::now();
    links
        .create(NewLink {
            short_code: code.to_string(),
            long_url: url.to_string(),
            context: None,
            owner_id: "anonymous".to_string(),
            created_at: now - Duration::days(1),
            expires_at: now + lifetime,
        })
        .await
        .unwrap();
}
