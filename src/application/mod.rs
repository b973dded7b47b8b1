//! Application layer services implementing business logic.
//!
//! Services orchestrate repository, cache and external calls and give HTTP
//! handlers a small, typed API. They hold their collaborators as `Arc`
//! trait objects built once at startup.
//!
//! # Available Services
//!
//! - [`services::LinkService`] - Short link creation
//! - [`services::RedirectService`] - Short code resolution
//! - [`services::QrService`] - Cached QR images
//! - [`services::EnrichmentService`] - Redirect analytics enrichment

pub mod services;
