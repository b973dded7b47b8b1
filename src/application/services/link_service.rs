//! Link creation service.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, CachedLink, record_cache_error, ttl_until};
use crate::utils::code_generator::{CodeGenerator, validate_alias};
use crate::utils::url_validator::{MAX_CONTEXT_CHARS, context_within_limit, validate_long_url};

/// Generation attempts before giving up with [`AppError::CodeExhausted`].
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Result of a successful link creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLink {
    pub short_code: String,
    pub short_url: String,
    pub expires_at: DateTime<Utc>,
}

/// Joins the public base URL and a short code.
pub fn build_short_url(base_url: &str, short_code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), short_code)
}

/// Service for creating short links.
///
/// Validates input before any store access, assigns the short code (alias or
/// random), persists the link and warms the resolution cache.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    code_generator: CodeGenerator,
    base_url: String,
    link_lifetime: Duration,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        code_generator: CodeGenerator,
        base_url: impl Into<String>,
        link_lifetime: Duration,
    ) -> Self {
        Self {
            link_repository,
            cache,
            code_generator,
            base_url: base_url.into(),
            link_lifetime,
        }
    }

    /// Creates a short link.
    ///
    /// # Arguments
    ///
    /// - `long_url` - Destination URL, stored exactly as submitted (trimmed)
    /// - `alias` - Optional user-chosen short code; blank counts as absent
    /// - `context` - Optional annotation of at most 200 characters
    /// - `owner_id` - Creator id; `None` records the link as anonymous
    ///
    /// # Code Assignment
    ///
    /// - With an alias: the alias is validated and claimed, or the call fails
    ///   with [`AppError::AliasTaken`]. No generated code is ever substituted.
    /// - Without: a random code is generated, checked for uniqueness and
    ///   inserted, up to [`MAX_CODE_ATTEMPTS`] times. A unique violation on
    ///   insert consumes an attempt.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed URL, alias or context.
    /// Returns [`AppError::AliasTaken`] if the alias is already assigned.
    /// Returns [`AppError::CodeExhausted`] if no unique code was found.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn create_link(
        &self,
        long_url: &str,
        alias: Option<&str>,
        context: Option<&str>,
        owner_id: Option<String>,
    ) -> Result<CreatedLink, AppError> {
        let long_url = validate_long_url(long_url).map_err(|e| {
            AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        let context = context.map(str::trim).filter(|c| !c.is_empty());
        if let Some(context) = context
            && !context_within_limit(context)
        {
            return Err(AppError::bad_request(
                format!("Context must be at most {} characters", MAX_CONTEXT_CHARS),
                json!({ "provided_length": context.chars().count() }),
            ));
        }

        let alias = alias.map(str::trim).filter(|a| !a.is_empty());
        if let Some(alias) = alias {
            validate_alias(alias)?;
        }

        let now = Utc::now();
        let context = context.map(str::to_string);

        let link = match alias {
            Some(alias) => {
                self.claim_alias(alias, long_url, context, owner_id, now)
                    .await?
            }
            None => {
                self.create_with_generated_code(long_url, context, owner_id, now)
                    .await?
            }
        };

        info!(
            short_code = %link.short_code,
            owner_id = %link.owner_id,
            "Short link created"
        );

        self.warm_cache(&link, now).await;

        Ok(CreatedLink {
            short_url: self.short_url(&link.short_code),
            short_code: link.short_code,
            expires_at: link.expires_at,
        })
    }

    /// Full public URL for a short code.
    pub fn short_url(&self, short_code: &str) -> String {
        build_short_url(&self.base_url, short_code)
    }

    /// Checks if the link store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.link_repository.health_check().await
    }

    async fn claim_alias(
        &self,
        alias: &str,
        long_url: String,
        context: Option<String>,
        owner_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Link, AppError> {
        if self.link_repository.exists(alias).await? {
            return Err(AppError::AliasTaken {
                alias: alias.to_string(),
            });
        }

        // A concurrent creation may still win; the store reports it as AliasTaken.
        let new_link = NewLink::with_lifetime(
            alias.to_string(),
            long_url,
            context,
            owner_id,
            now,
            self.link_lifetime,
        );
        self.link_repository.create(new_link).await
    }

    async fn create_with_generated_code(
        &self,
        long_url: String,
        context: Option<String>,
        owner_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Link, AppError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = self.code_generator.generate()?;

            if self.link_repository.exists(&code).await? {
                debug!(attempt, "Generated code {} already assigned", code);
                continue;
            }

            let new_link = NewLink::with_lifetime(
                code,
                long_url.clone(),
                context.clone(),
                owner_id.clone(),
                now,
                self.link_lifetime,
            );

            match self.link_repository.create(new_link).await {
                Ok(link) => return Ok(link),
                Err(AppError::AliasTaken { alias }) => {
                    warn!(attempt, "Generated code {} claimed concurrently", alias);
                }
                Err(e) => return Err(e),
            }
        }

        error!(
            attempts = MAX_CODE_ATTEMPTS,
            "Could not generate a unique short code"
        );
        Err(AppError::CodeExhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    async fn warm_cache(&self, link: &Link, now: DateTime<Utc>) {
        let Some(ttl) = ttl_until(link.expires_at, now) else {
            return;
        };

        let cached = CachedLink::new(link.long_url.clone(), link.expires_at);
        if let Err(e) = self.cache.set_link(&link.short_code, &cached, ttl).await {
            record_cache_error("set", &link.short_code, &e);
        }
    }
}
