//! Utility functions for code generation, input validation, and request handling.
//!
//! - [`code_generator`] - Short code generation and alias validation
//! - [`url_validator`] - Destination URL and context checks
//! - [`client_ip`] - Client address extraction and locality checks
//! - [`db_error`] - Database error classification

pub mod client_ip;
pub mod code_generator;
pub mod db_error;
pub mod url_validator;
