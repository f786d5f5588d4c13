//! Click event message for asynchronous click tracking.

/// In-memory click message passed from the redirect handler to the
/// background worker over a bounded channel. Decouples the redirect
/// response from the two database writes (click row, counter increment).
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub link_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

/// Maximum stored length for user agent and referer values.
const META_MAX_CHARS: usize = 255;

impl ClickEvent {
    /// Builds a click event, truncating header-derived metadata to the
    /// column width so oversized headers cannot fail the insert.
    pub fn new(
        link_id: i64,
        ip: Option<String>,
        user_agent: Option<&str>,
        referer: Option<&str>,
    ) -> Self {
        Self {
            link_id,
            ip,
            user_agent: user_agent.map(truncate),
            referer: referer.map(truncate),
        }
    }
}

fn truncate(value: &str) -> String {
    value.chars().take(META_MAX_CHARS).collect()
}
