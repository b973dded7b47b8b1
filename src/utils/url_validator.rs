//! Destination URL and link context validation.

use url::Url;

/// Maximum number of characters allowed in a link's context annotation.
pub const MAX_CONTEXT_CHARS: usize = 200;

/// Reasons a destination URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL cannot be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL must include a host")]
    MissingHost,
}

/// Checks that `input` is an absolute URL with a scheme and a host.
///
/// The URL is returned trimmed but otherwise unchanged: redirects go to
/// exactly what the creator submitted.
///
/// # Errors
///
/// - [`UrlValidationError::Empty`] for blank input
/// - [`UrlValidationError::InvalidFormat`] when parsing fails, including a missing scheme
/// - [`UrlValidationError::MissingHost`] for scheme-only URLs like `mailto:x`
///
/// # Examples
///
/// ```ignore
/// assert!(validate_long_url("https://example.com/a").is_ok());
/// assert!(validate_long_url("example.com").is_err());
/// assert!(validate_long_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_long_url(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(trimmed.to_string()),
        _ => Err(UrlValidationError::MissingHost),
    }
}

/// Returns true if `context` fits within [`MAX_CONTEXT_CHARS`].
pub fn context_within_limit(context: &str) -> bool {
    context.chars().count() <= MAX_CONTEXT_CHARS
}
