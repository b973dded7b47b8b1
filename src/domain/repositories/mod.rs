//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented in `crate::infrastructure::persistence`. Mock implementations
//! are generated via `mockall` for unit tests.
//!
//! - [`LinkRepository`] - Short link storage and uniqueness checks
//! - [`AnalyticsRepository`] - Append-only redirect analytics

pub mod analytics_repository;
pub mod link_repository;

pub use analytics_repository::AnalyticsRepository;
pub use link_repository::LinkRepository;

#[cfg(test)]
pub use analytics_repository::MockAnalyticsRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
