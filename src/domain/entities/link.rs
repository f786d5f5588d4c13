//! Link entity: the durable mapping from a short code to a target URL.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A short link with its lifecycle metadata.
///
/// `code` is the natural key: globally unique, case-sensitive, 3-20 chars
/// from `[A-Za-z0-9_-]`. Mutations go through the repository only; callers
/// never read-modify-write these fields.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub url: String,
    pub is_active: bool,
    pub click_count: i64,
    pub created_by: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Returns true once the expiry time has passed.
    ///
    /// A link created with `expires_at = now` counts as expired immediately.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|e| Utc::now() >= e)
    }
}

/// Input for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: String,
    pub url: String,
    pub created_by: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged.
/// `expires_at: Some(None)` clears the expiry; `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default)]
pub struct LinkPatch {
    pub url: Option<String>,
    pub is_active: Option<bool>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl LinkPatch {
    /// True when no field is set; repositories reject empty patches.
    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.is_active.is_none() && self.expires_at.is_none()
    }
}
