//! Core domain entities.
//!
//! - [`Link`] - A short code mapping with its lifetime
//! - [`AnalyticsEvent`] - One recorded redirect, enriched with location data
//!
//! Entities follow the "New Type" pattern with separate structs for creation
//! (`NewLink`, `NewAnalyticsEvent`).

pub mod analytics;
pub mod link;

pub use analytics::{AnalyticsEvent, GeoLocation, LOCAL_LOCATION, NewAnalyticsEvent, UNKNOWN_LOCATION};
pub use link::{ANONYMOUS_OWNER, Link, NewLink};
