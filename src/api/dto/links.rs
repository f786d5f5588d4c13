//! DTOs for the link management endpoints.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::Link;

/// Compiled regex for custom code validation.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Request to create a short link.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Target URL (absolute http/https, at most 2000 characters).
    #[validate(
        url(message = "Invalid URL format"),
        length(max = 2000, message = "URL must not exceed 2000 characters")
    )]
    pub url: String,

    /// Optional custom short code instead of a generated one.
    #[validate(
        length(min = 3, max = 20, message = "Custom code must be 3-20 characters"),
        regex(
            path = "*CUSTOM_CODE_REGEX",
            message = "Custom code can only contain letters, digits, underscores, and hyphens"
        )
    )]
    pub custom_code: Option<String>,

    /// Days until expiry, counted from now. `0` expires immediately.
    #[validate(range(min = 0, max = 3650))]
    pub expiration_days: Option<i64>,
}

/// Partial update for an existing link. Absent fields stay unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(
        url(message = "Invalid URL format"),
        length(max = 2000, message = "URL must not exceed 2000 characters")
    )]
    pub url: Option<String>,

    pub is_active: Option<bool>,

    #[validate(range(min = 0, max = 3650))]
    pub expiration_days: Option<i64>,
}

/// Query parameters for the link list.
#[derive(Debug, Default, Deserialize)]
pub struct ListLinksQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// When true, only links created by the calling token.
    pub mine: Option<bool>,
}

/// One link as rendered by the API.
#[derive(Debug, Serialize)]
pub struct LinkData {
    pub id: i64,
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub is_active: bool,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl LinkData {
    pub fn from_link(link: &Link, short_url: String) -> Self {
        Self {
            id: link.id,
            code: link.code.clone(),
            short_url,
            original_url: link.url.clone(),
            is_active: link.is_active,
            click_count: link.click_count,
            created_at: link.created_at,
            expires_at: link.expires_at,
            last_accessed_at: link.last_accessed_at,
        }
    }
}

/// Paginated link list payload.
#[derive(Debug, Serialize)]
pub struct LinkListData {
    pub links: Vec<LinkData>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}
