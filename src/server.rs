//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache selection, enrichment workers, and
//! the Axum server lifecycle including graceful shutdown.

use crate::application::services::EnrichmentService;
use crate::config::Config;
use crate::domain::enrichment_worker::EnrichmentWorkers;
use crate::infrastructure::cache::{CacheService, MemoryCache, NullCache, RedisCache};
use crate::infrastructure::geo::IpApiLocator;
use crate::infrastructure::persistence::{PgAnalyticsRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::{AppState, ServiceSettings};

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Resolution cache (Redis, or in-process when Redis is not configured)
/// - Enrichment workers
/// - Axum HTTP server
///
/// On SIGINT/SIGTERM the server stops accepting connections, finishes
/// in-flight requests, then gives the enrichment workers up to
/// `SHUTDOWN_DRAIN_SECS` to flush queued events.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let cache = select_cache(&config).await;

    let pool = Arc::new(pool);
    let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));
    let analytics_repository = Arc::new(PgAnalyticsRepository::new(pool));

    let geo_locator = Arc::new(
        IpApiLocator::new(config.geo_api_url.clone(), config.geo_timeout())
            .context("Failed to build geolocation client")?,
    );
    let enrichment = Arc::new(EnrichmentService::new(
        analytics_repository,
        geo_locator,
        config.geo_timeout(),
    ));
    let (enrichment_queue, workers) = EnrichmentWorkers::start(
        enrichment,
        config.enrichment_queue_capacity,
        config.enrichment_workers,
    );

    let state = AppState::new(
        link_repository,
        cache,
        enrichment_queue,
        ServiceSettings {
            base_url: config.base_url.clone(),
            link_lifetime: config.link_lifetime(),
            qr_size: config.qr_size,
        },
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("HTTP server stopped, draining enrichment queue");
    if tokio::time::timeout(config.shutdown_drain(), workers.shutdown())
        .await
        .is_err()
    {
        tracing::warn!(
            drain_secs = config.shutdown_drain_secs,
            "Enrichment queue not drained in time, remaining events dropped"
        );
    }

    Ok(())
}

/// Picks the resolution cache backend.
///
/// A configured but unreachable Redis degrades to [`NullCache`] so the
/// service keeps answering from the store.
async fn select_cache(config: &Config) -> Arc<dyn CacheService> {
    match &config.redis_url {
        Some(redis_url) => match RedisCache::connect(redis_url).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        },
        None => {
            tracing::info!(
                capacity = config.memory_cache_capacity,
                "Cache enabled (in-process)"
            );
            Arc::new(MemoryCache::new(config.memory_cache_capacity))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
