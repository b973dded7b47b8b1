//! HTTP middleware and request extensions.

pub mod owner;
pub mod tracing;

pub use owner::OwnerId;
