//! Domain layer containing business entities and logic.
//!
//! Defines the entities, the repository contracts implemented by the
//! infrastructure layer, and the asynchronous redirect enrichment pipeline.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`redirect_event`] - Metadata captured for each served redirect
//! - [`enrichment_worker`] - Bounded worker pool processing redirect events
//!
//! # Redirect Processing Flow
//!
//! 1. HTTP handler resolves the short code and answers immediately
//! 2. A [`redirect_event::RedirectEvent`] is submitted to the enrichment queue
//! 3. A worker geolocates the client address
//! 4. The enriched row is appended via [`repositories::AnalyticsRepository`]

pub mod enrichment_worker;
pub mod entities;
pub mod redirect_event;
pub mod repositories;
