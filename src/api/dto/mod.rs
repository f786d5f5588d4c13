//! Request/response DTOs and the JSON response envelope.

mod health;
mod links;

pub use health::{ClickQueueHealth, HealthResponse};
pub use links::{
    CreateLinkRequest, LinkData, LinkListData, ListLinksQuery, Pagination, UpdateLinkRequest,
};

use serde::Serialize;

/// Success envelope carrying a payload: `{"success": true, "data": {...}}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Success envelope carrying only a message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
