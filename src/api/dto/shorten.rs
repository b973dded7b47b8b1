//! DTOs for link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::application::services::CreatedLink;
use crate::utils::code_generator::ALIAS_MAX_LEN;
use crate::utils::url_validator::MAX_CONTEXT_CHARS;

/// Request to shorten a URL.
///
/// Only upper length bounds are checked here, on trimmed input. URL, alias
/// and context rules are enforced by
/// [`crate::application::services::LinkService`].
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// Destination URL; must be absolute with a scheme and a host.
    pub long_url: String,

    /// Optional custom short code.
    #[validate(custom(function = "alias_within_limit"))]
    pub alias: Option<String>,

    /// Optional free-form annotation.
    #[validate(custom(function = "context_within_limit"))]
    pub context: Option<String>,
}

fn trimmed_max_chars(
    value: &str,
    max: usize,
    message: &'static str,
) -> Result<(), ValidationError> {
    if value.trim().chars().count() <= max {
        Ok(())
    } else {
        Err(ValidationError::new("length").with_message(Cow::Borrowed(message)))
    }
}

fn alias_within_limit(alias: &str) -> Result<(), ValidationError> {
    trimmed_max_chars(alias, ALIAS_MAX_LEN, "alias must be at most 50 characters")
}

fn context_within_limit(context: &str) -> Result<(), ValidationError> {
    trimmed_max_chars(context, MAX_CONTEXT_CHARS, "context must be at most 200 characters")
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_code: String,
    pub short_url: String,
    pub expires_at: DateTime<Utc>,
}

impl From<CreatedLink> for ShortenResponse {
    fn from(link: CreatedLink) -> Self {
        Self {
            short_code: link.short_code,
            short_url: link.short_url,
            expires_at: link.expires_at,
        }
    }
}
