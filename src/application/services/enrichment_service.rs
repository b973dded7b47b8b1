//! Redirect analytics enrichment.

use async_trait::async_trait;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::enrichment_worker::RedirectEventHandler;
use crate::domain::entities::{GeoLocation, NewAnalyticsEvent};
use crate::domain::redirect_event::RedirectEvent;
use crate::domain::repositories::AnalyticsRepository;
use crate::infrastructure::geo::{GeoError, GeoLocator};
use crate::utils::client_ip::is_local_ip;

/// Turns redirect events into analytics rows.
///
/// Best effort from end to end: a failed or slow geolocation yields the
/// `Unknown` location, and a failed append is logged and counted but never
/// retried. Nothing here can reach the client that triggered the redirect.
pub struct EnrichmentService {
    analytics_repository: Arc<dyn AnalyticsRepository>,
    geo_locator: Arc<dyn GeoLocator>,
    geo_timeout: Duration,
}

impl EnrichmentService {
    pub fn new(
        analytics_repository: Arc<dyn AnalyticsRepository>,
        geo_locator: Arc<dyn GeoLocator>,
        geo_timeout: Duration,
    ) -> Self {
        Self {
            analytics_repository,
            geo_locator,
            geo_timeout,
        }
    }

    /// Geolocates an address, falling back instead of failing.
    ///
    /// Local addresses resolve to `Local` without a lookup. Lookup errors and
    /// timeouts resolve to `Unknown`.
    pub async fn locate(&self, ip: IpAddr) -> GeoLocation {
        if is_local_ip(ip) {
            return GeoLocation::local();
        }

        let lookup = tokio::time::timeout(self.geo_timeout, self.geo_locator.locate(ip))
            .await
            .unwrap_or_else(|_| Err(GeoError::Timeout(self.geo_timeout)));

        match lookup {
            Ok(location) => location,
            Err(e) => {
                let reason = degraded_reason(&e);
                warn!(%ip, error = %e, "Geolocation failed, recording unknown location");
                metrics::counter!("linkchop_enrichment_degraded_total", "reason" => reason)
                    .increment(1);
                GeoLocation::unknown()
            }
        }
    }

    /// Enriches one redirect event and appends it to the analytics store.
    pub async fn process(&self, event: RedirectEvent) {
        let location = self.locate(event.ip).await;

        let row = NewAnalyticsEvent {
            short_code: event.short_code,
            ip_address: event.ip.to_string(),
            user_agent: event.user_agent,
            referrer: event.referrer,
            location,
        };

        let short_code = row.short_code.clone();
        match self.analytics_repository.append(row).await {
            Ok(()) => debug!("Analytics recorded for {}", short_code),
            Err(e) => {
                warn!(short_code = %short_code, error = %e, "Failed to record analytics event");
                metrics::counter!("linkchop_enrichment_degraded_total", "reason" => "append_failed")
                    .increment(1);
            }
        }
    }
}

/// Metric label for a failed lookup.
fn degraded_reason(error: &GeoError) -> &'static str {
    match error {
        GeoError::Timeout(_) => "geo_timeout",
        _ => "geo_error",
    }
}

#[async_trait]
impl RedirectEventHandler for EnrichmentService {
    async fn handle(&self, event: RedirectEvent) {
        self.process(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockAnalyticsRepository;
    use crate::error::AppError;
    use crate::infrastructure::geo::MockGeoLocator;
    use serde_json::json;

    fn event(ip: &str) -> RedirectEvent {
        RedirectEvent::new(
            "abc123".to_string(),
            ip.parse().unwrap(),
            Some("Mozilla/5.0"),
            Some("https://news.example"),
        )
    }

    fn service(repo: MockAnalyticsRepository, geo: impl GeoLocator + 'static) -> EnrichmentService {
        EnrichmentService::new(Arc::new(repo), Arc::new(geo), Duration::from_millis(50))
    }

    struct SlowLocator;

    #[async_trait]
    impl GeoLocator for SlowLocator {
        async fn locate(&self, _ip: IpAddr) -> Result<GeoLocation, GeoError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(GeoLocation::from_parts(Some("Late"), None, None))
        }
    }

    #[tokio::test]
    async fn test_public_address_is_geolocated() {
        let mut geo = MockGeoLocator::new();
        geo.expect_locate().times(1).returning(|_| {
            Ok(GeoLocation::from_parts(
                Some("Germany"),
                Some("Berlin"),
                Some("Berlin"),
            ))
        });

        let mut repo = MockAnalyticsRepository::new();
        repo.expect_append()
            .withf(|row: &NewAnalyticsEvent| {
                row.short_code == "abc123"
                    && row.ip_address == "203.0.113.7"
                    && row.user_agent.as_deref() == Some("Mozilla/5.0")
                    && row.referrer.as_deref() == Some("https://news.example")
                    && row.location.country == "Germany"
            })
            .times(1)
            .returning(|_| Ok(()));

        service(repo, geo).process(event("203.0.113.7")).await;
    }

    #[tokio::test]
    async fn test_local_address_skips_lookup() {
        let mut geo = MockGeoLocator::new();
        geo.expect_locate().never();

        let mut repo = MockAnalyticsRepository::new();
        repo.expect_append()
            .withf(|row: &NewAnalyticsEvent| row.location == GeoLocation::local())
            .times(1)
            .returning(|_| Ok(()));

        let svc = service(repo, geo);
        svc.process(event("127.0.0.1")).await;
    }

    #[tokio::test]
    async fn test_private_ranges_are_local() {
        let mut geo = MockGeoLocator::new();
        geo.expect_locate().never();
        let svc = service(MockAnalyticsRepository::new(), geo);

        for ip in ["10.0.0.8", "192.168.1.20", "fe80::1", "fd00::5"] {
            assert_eq!(svc.locate(ip.parse().unwrap()).await, GeoLocation::local());
        }
    }

    #[tokio::test]
    async fn test_lookup_failure_records_unknown() {
        let mut geo = MockGeoLocator::new();
        geo.expect_locate()
            .returning(|_| Err(GeoError::Status(429)));

        let mut repo = MockAnalyticsRepository::new();
        repo.expect_append()
            .withf(|row: &NewAnalyticsEvent| row.location == GeoLocation::unknown())
            .times(1)
            .returning(|_| Ok(()));

        service(repo, geo).process(event("8.8.8.8")).await;
    }

    #[test]
    fn test_degraded_reason_labels() {
        assert_eq!(
            degraded_reason(&GeoError::Timeout(Duration::from_secs(5))),
            "geo_timeout"
        );
        assert_eq!(degraded_reason(&GeoError::Status(503)), "geo_error");
        assert_eq!(degraded_reason(&GeoError::Api("quota".into())), "geo_error");
    }

    #[tokio::test]
    async fn test_lookup_timeout_records_unknown() {
        let mut repo = MockAnalyticsRepository::new();
        repo.expect_append()
            .withf(|row: &NewAnalyticsEvent| row.location == GeoLocation::unknown())
            .times(1)
            .returning(|_| Ok(()));

        let started = std::time::Instant::now();
        service(repo, SlowLocator).process(event("8.8.8.8")).await;

        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_append_failure_is_swallowed() {
        let mut geo = MockGeoLocator::new();
        geo.expect_locate().returning(|_| Ok(GeoLocation::unknown()));

        let mut repo = MockAnalyticsRepository::new();
        repo.expect_append()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        service(repo, geo).process(event("8.8.8.8")).await;
    }
}
