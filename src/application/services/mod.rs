//! Business logic services for the application layer.

pub mod enrichment_service;
pub mod link_service;
pub mod qr_service;
pub mod redirect_service;

pub use enrichment_service::EnrichmentService;
pub use link_service::{CreatedLink, LinkService};
pub use qr_service::QrService;
pub use redirect_service::{RedirectService, Resolution};
