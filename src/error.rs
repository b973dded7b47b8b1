//! Application error type and its HTTP mapping.
//!
//! Only caller-actionable conditions are represented here. Cache, geolocation
//! and analytics failures are absorbed by the services that hit them and never
//! become an [`AppError`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload returned to API clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed destination URL, alias or context. Raised before any store access.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// The requested alias is already assigned to another link.
    #[error("Alias '{alias}' is already taken")]
    AliasTaken { alias: String },

    /// No unique random code was found within the retry bound.
    #[error("Could not generate a unique short code after {attempts} attempts")]
    CodeExhausted { attempts: usize },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The link exists but its lifetime has ended.
    #[error("{message}")]
    Gone { message: String, details: Value },

    /// QR image rendering failed.
    #[error("Failed to render QR code: {0}")]
    RenderFailed(String),

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn gone(message: impl Into<String>, details: Value) -> Self {
        Self::Gone {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::AliasTaken { .. } => StatusCode::CONFLICT,
            AppError::CodeExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Gone { .. } => StatusCode::GONE,
            AppError::RenderFailed(_) | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converts the error into the JSON payload sent to clients.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, details) = match self {
            AppError::Validation { details, .. } => ("validation_error", details.clone()),
            AppError::AliasTaken { alias } => ("alias_taken", json!({ "alias": alias })),
            AppError::CodeExhausted { attempts } => {
                ("code_exhausted", json!({ "attempts": attempts }))
            }
            AppError::NotFound { details, .. } => ("not_found", details.clone()),
            AppError::Gone { details, .. } => ("gone", details.clone()),
            AppError::RenderFailed(_) => ("render_failed", json!({})),
            AppError::Internal { details, .. } => ("internal_error", details.clone()),
        };

        ErrorInfo {
            code,
            message: self.to_string(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", e);
        AppError::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&e).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::bad_request("bad", json!({})).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::AliasTaken {
                alias: "promo".to_string()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::CodeExhausted { attempts: 5 }.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::gone("expired", json!({})).status_code(),
            StatusCode::GONE
        );
        assert_eq!(
            AppError::RenderFailed("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_info_alias_taken() {
        let info = AppError::AliasTaken {
            alias: "promo".to_string(),
        }
        .to_error_info();

        assert_eq!(info.code, "alias_taken");
        assert_eq!(info.details["alias"], "promo");
        assert!(info.message.contains("promo"));
    }

    #[test]
    fn test_error_info_code_exhausted() {
        let info = AppError::CodeExhausted { attempts: 5 }.to_error_info();
        assert_eq!(info.code, "code_exhausted");
        assert_eq!(info.details["attempts"], 5);
    }
}
