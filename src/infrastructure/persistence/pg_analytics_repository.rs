//! PostgreSQL implementation of the analytics repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::NewAnalyticsEvent;
use crate::domain::repositories::AnalyticsRepository;
use crate::error::AppError;

/// Append-only PostgreSQL store for redirect analytics.
pub struct PgAnalyticsRepository {
    pool: Arc<PgPool>,
}

impl PgAnalyticsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsRepository for PgAnalyticsRepository {
    async fn append(&self, event: NewAnalyticsEvent) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO analytics
                (short_code, ip_address, user_agent, referrer, country, region, city)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&event.short_code)
        .bind(&event.ip_address)
        .bind(&event.user_agent)
        .bind(&event.referrer)
        .bind(&event.location.country)
        .bind(&event.location.region)
        .bind(&event.location.city)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}
