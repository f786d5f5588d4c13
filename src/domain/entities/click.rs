//! Click entity: one row per successful resolution of a link.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A recorded click, kept for analytics. Never mutated after insertion;
/// removed only when its link is deleted (cascade).
#[derive(Debug, Clone, FromRow)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a click. Metadata fields are optional; missing
/// headers must not prevent the click from being logged.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub link_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}
