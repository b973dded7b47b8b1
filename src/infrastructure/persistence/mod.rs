//! Repository implementations.
//!
//! Concrete implementations of the domain repository traits: PostgreSQL via
//! SQLx for production, and in-memory stores for tests and local runs.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage and uniqueness checks
//! - [`PgAnalyticsRepository`] - Append-only redirect analytics
//! - [`MemoryLinkRepository`], [`MemoryAnalyticsRepository`] - In-process equivalents

pub mod memory;
pub mod pg_analytics_repository;
pub mod pg_link_repository;

pub use memory::{MemoryAnalyticsRepository, MemoryLinkRepository};
pub use pg_analytics_repository::PgAnalyticsRepository;
pub use pg_link_repository::PgLinkRepository;
