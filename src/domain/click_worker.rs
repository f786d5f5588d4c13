//! Background consumer for click events.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::NewClick;
use crate::domain::repositories::{ClickRepository, LinkRepository};

/// Drains the click channel until every sender is dropped.
///
/// Each event triggers two writes, each best-effort on its own: the click
/// row insert and the atomic counter increment. A failure in either is
/// logged and swallowed; the visitor was already redirected.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    clicks: Arc<dyn ClickRepository>,
    links: Arc<dyn LinkRepository>,
) {
    while let Some(event) = rx.recv().await {
        let link_id = event.link_id;

        if let Err(e) = clicks
            .record(NewClick {
                link_id,
                ip: event.ip,
                user_agent: event.user_agent,
                referer: event.referer,
            })
            .await
        {
            warn!(link_id, error = %e, "failed to record click");
        }

        if let Err(e) = links.increment_click_and_touch(link_id).await {
            warn!(link_id, error = %e, "failed to increment click count");
        }
    }

    debug!("click worker stopped");
}
