//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for persistence, caching, geolocation and QR
//! rendering.
//!
//! # Modules
//!
//! - [`cache`] - Caching abstractions (Redis, in-process and no-op implementations)
//! - [`geo`] - Client IP geolocation over HTTP
//! - [`persistence`] - PostgreSQL and in-memory repository implementations
//! - [`qr`] - PNG QR code rendering

pub mod cache;
pub mod geo;
pub mod persistence;
pub mod qr;
