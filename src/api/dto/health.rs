//! Health check response shape.

use serde::Serialize;

/// Service health summary.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: &'static str,
    /// `"ok"` or `"unreachable"`.
    pub database: &'static str,
    pub click_queue: ClickQueueHealth,
}

/// Click channel occupancy; a shrinking `available` means the worker is
/// falling behind.
#[derive(Debug, Serialize)]
pub struct ClickQueueHealth {
    pub capacity: usize,
    pub available: usize,
}
