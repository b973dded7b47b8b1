//! Link entity representing a short code mapping.

use chrono::{DateTime, Duration, Utc};

/// Owner id recorded for links created without an authenticated user.
pub const ANONYMOUS_OWNER: &str = "anonymous";

/// A short code mapped to its destination URL.
///
/// Links are never mutated after creation. Expiry is terminal: once
/// `expires_at` is reached the link no longer resolves, even though the row
/// stays in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub short_code: String,
    pub long_url: String,
    pub context: Option<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        short_code: String,
        long_url: String,
        context: Option<String>,
        owner_id: String,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            short_code,
            long_url,
            context,
            owner_id,
            created_at,
            expires_at,
        }
    }

    /// Returns true if the link has expired at `now`.
    ///
    /// The boundary itself counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub short_code: String,
    pub long_url: String,
    pub context: Option<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl NewLink {
    /// Builds a link that lives for `lifetime` starting at `now`.
    ///
    /// A missing owner is recorded as [`ANONYMOUS_OWNER`].
    pub fn with_lifetime(
        short_code: String,
        long_url: String,
        context: Option<String>,
        owner_id: Option<String>,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            short_code,
            long_url,
            context,
            owner_id: owner_id.unwrap_or_else(|| ANONYMOUS_OWNER.to_string()),
            created_at: now,
            expires_at: now + lifetime,
        }
    }
}
