//! Handler for link shortening endpoint.

use axum::{Extension, Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::middleware::OwnerId;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "long_url": "https://example.com/some/long/path",
///   "alias": "spring-sale",   // optional
///   "context": "newsletter"   // optional
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "short_code": "spring-sale",
///   "short_url": "http://localhost:3001/spring-sale",
///   "expires_at": "2026-04-01T12:00:00Z"
/// }
/// ```
///
/// The link is owned by the [`OwnerId`] extension when an outer layer set
/// one, and is anonymous otherwise.
///
/// # Errors
///
/// Returns 400 Bad Request for an invalid URL, alias or context.
/// Returns 409 Conflict if the alias is taken.
/// Returns 503 Service Unavailable if no unique code could be generated.
pub async fn shorten_handler(
    State(state): State<AppState>,
    owner: Option<Extension<OwnerId>>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let owner_id = owner.map(|Extension(owner)| owner.into_inner());

    let created = state
        .link_service
        .create_link(
            &payload.long_url,
            payload.alias.as_deref(),
            payload.context.as_deref(),
            owner_id,
        )
        .await?;

    Ok(Json(created.into()))
}
