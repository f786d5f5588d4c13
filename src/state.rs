//! Shared application state injected into all handlers.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{AuthService, LinkService, RedirectService};
use crate::domain::click_event::ClickEvent;

/// Handler-facing view of the running application.
///
/// Cheap to clone; all services are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub auth_service: Arc<AuthService>,
    pub click_tx: mpsc::Sender<ClickEvent>,
    /// When true, client IPs are read from X-Forwarded-For / X-Real-IP.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService>,
        redirect_service: Arc<RedirectService>,
        auth_service: Arc<AuthService>,
        click_tx: mpsc::Sender<ClickEvent>,
        behind_proxy: bool,
    ) -> Self {
        Self {
            link_service,
            redirect_service,
            auth_service,
            click_tx,
            behind_proxy,
        }
    }
}
