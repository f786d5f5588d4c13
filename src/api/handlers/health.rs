use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::error;

use crate::api::dto::{ClickQueueHealth, HealthResponse};
use crate::state::AppState;

/// Liveness and readiness probe.
///
/// # Endpoint
///
/// `GET /health`
///
/// Runs a trivial query through the link store. Returns `200` when the
/// database answers, `503` otherwise. Unauthenticated, not rate limited.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let click_queue = ClickQueueHealth {
        capacity: state.click_tx.max_capacity(),
        available: state.click_tx.capacity(),
    };

    match state.link_service.count_links().await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                database: "ok",
                click_queue,
            }),
        ),
        Err(err) => {
            error!("health check failed: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    database: "unreachable",
                    click_queue,
                }),
            )
        }
    }
}
