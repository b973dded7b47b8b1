//! Repository trait for the append-only analytics record.

use crate::domain::entities::NewAnalyticsEvent;
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only store of redirect analytics.
///
/// Rows are never updated or deleted by this service. Aggregation queries
/// belong to the reporting side and are not part of this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Appends one analytics event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors, including a missing
    /// parent link.
    async fn append(&self, event: NewAnalyticsEvent) -> Result<(), AppError>;
}
