//! In-process repository implementations.
//!
//! Back the service when it runs without PostgreSQL in tests and local
//! experiments. Both keep everything in memory and lose it on restart.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{AnalyticsEvent, Link, NewAnalyticsEvent, NewLink};
use crate::domain::repositories::{AnalyticsRepository, LinkRepository};
use crate::error::AppError;

/// Link store backed by a [`DashMap`].
///
/// Inserts go through the entry API, so check-and-insert for one code is
/// atomic just like the unique constraint in PostgreSQL.
#[derive(Debug, Default)]
pub struct MemoryLinkRepository {
    links: DashMap<String, Link>,
    next_id: AtomicI64,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        match self.links.entry(new_link.short_code.clone()) {
            Entry::Occupied(_) => Err(AppError::AliasTaken {
                alias: new_link.short_code,
            }),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
                let link = Link::new(
                    id,
                    new_link.short_code,
                    new_link.long_url,
                    new_link.context,
                    new_link.owner_id,
                    new_link.created_at,
                    new_link.expires_at,
                );
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.get(short_code).map(|l| l.clone()))
    }

    async fn exists(&self, short_code: &str) -> Result<bool, AppError> {
        Ok(self.links.contains_key(short_code))
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Analytics store that keeps appended rows in a vector.
#[derive(Debug, Default)]
pub struct MemoryAnalyticsRepository {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl MemoryAnalyticsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every appended row, oldest first.
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AnalyticsRepository for MemoryAnalyticsRepository {
    async fn append(&self, event: NewAnalyticsEvent) -> Result<(), AppError> {
        let mut events = self.events.lock().map_err(|_| {
            AppError::internal("Analytics store lock poisoned", serde_json::json!({}))
        })?;

        let id = events.len() as i64 + 1;
        events.push(AnalyticsEvent {
            id,
            short_code: event.short_code,
            ip_address: event.ip_address,
            user_agent: event.user_agent,
            referrer: event.referrer,
            location: event.location,
            created_at: Utc::now(),
        });

        Ok(())
    }
}
