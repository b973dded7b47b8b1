//! Analytics event recorded once per completed redirect.

use chrono::{DateTime, Utc};

/// Location value used for loopback, private and link-local clients.
pub const LOCAL_LOCATION: &str = "Local";

/// Location value used when a lookup fails or returns nothing.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// Geographic location of a client address.
///
/// Every field always holds a value: either data from the lookup or one of
/// the fallback markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoLocation {
    pub country: String,
    pub region: String,
    pub city: String,
}

impl GeoLocation {
    pub fn local() -> Self {
        Self::uniform(LOCAL_LOCATION)
    }

    pub fn unknown() -> Self {
        Self::uniform(UNKNOWN_LOCATION)
    }

    /// Builds a location from possibly missing fields, substituting
    /// [`UNKNOWN_LOCATION`] for blanks.
    pub fn from_parts(country: Option<&str>, region: Option<&str>, city: Option<&str>) -> Self {
        fn or_unknown(value: Option<&str>) -> String {
            match value.map(str::trim) {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => UNKNOWN_LOCATION.to_string(),
            }
        }

        Self {
            country: or_unknown(country),
            region: or_unknown(region),
            city: or_unknown(city),
        }
    }

    fn uniform(value: &str) -> Self {
        Self {
            country: value.to_string(),
            region: value.to_string(),
            city: value.to_string(),
        }
    }
}

/// A stored analytics row.
#[derive(Debug, Clone)]
pub struct AnalyticsEvent {
    pub id: i64,
    pub short_code: String,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub location: GeoLocation,
    pub created_at: DateTime<Utc>,
}

/// Input data for appending an analytics row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnalyticsEvent {
    pub short_code: String,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub location: GeoLocation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_locations() {
        assert_eq!(GeoLocation::local().country, "Local");
        assert_eq!(GeoLocation::local().city, "Local");
        assert_eq!(GeoLocation::unknown().region, "Unknown");
    }

    #[test]
    fn test_from_parts_fills_blanks() {
        let location = GeoLocation::from_parts(Some("Germany"), Some("  "), None);

        assert_eq!(location.country, "Germany");
        assert_eq!(location.region, "Unknown");
        assert_eq!(location.city, "Unknown");
    }
}
