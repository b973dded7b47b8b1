//! Client IP geolocation.

use async_trait::async_trait;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

use crate::domain::entities::GeoLocation;

/// Placeholder substituted with the client address in the lookup URL.
pub const IP_PLACEHOLDER: &str = "{ip}";

/// Default lookup endpoint (ipapi.co JSON API).
pub const DEFAULT_GEO_API_URL: &str = "https://ipapi.co/{ip}/json/";

/// Errors from a geolocation lookup.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("geolocation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("geolocation API returned status {0}")]
    Status(u16),

    #[error("geolocation API error: {0}")]
    Api(String),

    #[error("geolocation lookup timed out after {0:?}")]
    Timeout(Duration),
}

/// Resolves a public IP address to a location.
///
/// Callers are expected to skip local addresses and to apply their own
/// fallbacks; implementations report every failure as a [`GeoError`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn locate(&self, ip: IpAddr) -> Result<GeoLocation, GeoError>;
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    country_name: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    error: bool,
    #[serde(default)]
    reason: Option<String>,
}

impl IpApiResponse {
    fn into_location(self) -> Result<GeoLocation, GeoError> {
        if self.error {
            return Err(GeoError::Api(
                self.reason.unwrap_or_else(|| "unspecified".to_string()),
            ));
        }

        Ok(GeoLocation::from_parts(
            self.country_name.as_deref(),
            self.region.as_deref(),
            self.city.as_deref(),
        ))
    }
}

/// [`GeoLocator`] backed by an ipapi.co compatible HTTP API.
pub struct IpApiLocator {
    client: reqwest::Client,
    url_template: String,
}

impl IpApiLocator {
    /// Builds a locator for `url_template`, which must contain `{ip}`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Request`] if the HTTP client cannot be built.
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self, GeoError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("linkchop/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url_template: url_template.into(),
        })
    }

    fn lookup_url(&self, ip: IpAddr) -> String {
        self.url_template.replace(IP_PLACEHOLDER, &ip.to_string())
    }
}

#[async_trait]
impl GeoLocator for IpApiLocator {
    async fn locate(&self, ip: IpAddr) -> Result<GeoLocation, GeoError> {
        let response = self.client.get(self.lookup_url(ip)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::Status(status.as_u16()));
        }

        response.json::<IpApiResponse>().await?.into_location()
    }
}
