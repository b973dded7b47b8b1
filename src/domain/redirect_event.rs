//! Redirect event model for asynchronous enrichment.

use std::net::IpAddr;

/// Request metadata captured when a redirect is served.
///
/// Handed from the redirect handler to the enrichment workers through a
/// bounded queue, so the response never waits on geolocation or the
/// analytics store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectEvent {
    pub short_code: String,
    pub ip: IpAddr,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl RedirectEvent {
    /// Creates a new redirect event.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = RedirectEvent::new(
    ///     "abc123".to_string(),
    ///     "203.0.113.7".parse().unwrap(),
    ///     Some("Mozilla/5.0"),
    ///     None,
    /// );
    /// ```
    pub fn new(
        short_code: String,
        ip: IpAddr,
        user_agent: Option<&str>,
        referrer: Option<&str>,
    ) -> Self {
        Self {
            short_code,
            ip,
            user_agent: user_agent.map(str::to_string),
            referrer: referrer.map(str::to_string),
        }
    }
}
