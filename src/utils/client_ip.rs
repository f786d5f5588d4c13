//! Client IP extraction for click logging.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Resolves the client IP for a request.
///
/// When `behind_proxy` is set, `X-Forwarded-For` (first hop) and `X-Real-IP`
/// are consulted before the peer socket address. Off by default because these
/// headers are client-controlled when no trusted proxy strips them.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        if let Some(forwarded) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return forwarded.to_string();
        }

        if let Some(real_ip) = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return real_ip.to_string();
        }
    }

    peer.ip().to_string()
}
