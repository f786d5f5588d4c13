//! Handler for the short URL redirect entry point.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Responses
///
/// - `301 Moved Permanently` with `Location` and
///   `Cache-Control: no-cache, no-store, must-revalidate` — the permanent
///   status is paired with no-cache so clients revalidate each visit; the
///   mapping can be deactivated or deleted later.
/// - `404` for unknown, malformed, or deactivated codes.
/// - `410` for expired links.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let ip = client_ip(&headers, addr, state.behind_proxy);
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());
    let referer = headers.get(header::REFERER).and_then(|v| v.to_str().ok());

    let decision = state
        .redirect_service
        .resolve(&code, Some(ip), user_agent, referer)
        .await?;

    let location = HeaderValue::from_str(&decision.target_url)
        .map_err(|_| AppError::internal("Stored URL is not a valid header value"))?;

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [
            (header::LOCATION, location),
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-cache, no-store, must-revalidate"),
            ),
        ],
    )
        .into_response())
}
