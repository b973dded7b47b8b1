//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::net::SocketAddr;

use crate::application::services::Resolution;
use crate::domain::redirect_event::RedirectEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Redirects a short code to its destination.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code (cache first, then store; see
///    [`crate::application::services::RedirectService::resolve`])
/// 2. Queue a redirect event for analytics enrichment without waiting
/// 3. Return 301 Moved Permanently
///
/// The response never depends on enrichment: a full queue drops the event.
///
/// # Errors
///
/// Returns 404 Not Found if the code was never created.
/// Returns 410 Gone if the link has expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    match state.redirect_service.resolve(&code).await? {
        Resolution::Redirect(long_url) => {
            let event = RedirectEvent::new(
                code,
                client_ip(&headers, peer),
                headers
                    .get(header::USER_AGENT)
                    .and_then(|v| v.to_str().ok()),
                headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
            );
            state.enrichment_queue.submit(event);

            Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, long_url)]).into_response())
        }
        Resolution::NotFound => Err(AppError::not_found(
            "Short link not found",
            json!({ "short_code": code }),
        )),
        Resolution::Gone => Err(AppError::gone(
            "Short link has expired",
            json!({ "short_code": code }),
        )),
    }
}
