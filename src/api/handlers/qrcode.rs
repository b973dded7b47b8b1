//! Handler for QR code images.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Returns a PNG QR code encoding the short URL of `code`.
///
/// # Endpoint
///
/// `GET /api/qrcode/{code}`
///
/// # Errors
///
/// Returns 500 Internal Server Error if rendering fails.
pub async fn qrcode_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let png = state.qr_service.get_qr_image(&code).await?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
