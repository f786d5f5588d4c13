//! The redirect resolver: code in, routing decision out.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::sanitize_code;

/// A successful resolution: redirect the visitor to `target_url` with
/// permanent-redirect semantics and a no-cache directive, so browsers
/// revalidate against the live mapping instead of caching the binding.
#[derive(Debug, Clone)]
pub struct RedirectDecision {
    pub target_url: String,
}

/// Resolves inbound short codes to redirect decisions.
///
/// The decision depends only on the stored link; click logging and counting
/// are emitted as a fire-and-forget [`ClickEvent`] that the background
/// worker persists. A full queue or failed write never blocks the redirect.
pub struct RedirectService {
    links: Arc<dyn LinkRepository>,
    click_tx: mpsc::Sender<ClickEvent>,
}

impl RedirectService {
    /// Creates a new resolver.
    pub fn new(links: Arc<dyn LinkRepository>, click_tx: mpsc::Sender<ClickEvent>) -> Self {
        Self { links, click_tx }
    }

    /// Resolves a raw, untrusted path segment.
    ///
    /// # Decision sequence
    ///
    /// 1. Strip characters outside `[A-Za-z0-9_-]`; empty result is
    ///    [`AppError::InvalidCode`] (a 404).
    /// 2. Look up the code; missing is [`AppError::LinkNotFound`].
    /// 3. An inactive link answers exactly like a missing one, so disabled
    ///    links cannot be probed.
    /// 4. A past `expires_at` is [`AppError::LinkExpired`] (a 410, not
    ///    a 404).
    /// 5. Enqueue the click event and return the target URL.
    pub async fn resolve(
        &self,
        raw_code: &str,
        ip: Option<String>,
        user_agent: Option<&str>,
        referer: Option<&str>,
    ) -> Result<RedirectDecision, AppError> {
        let code = sanitize_code(raw_code);
        if code.is_empty() {
            return Err(AppError::InvalidCode);
        }

        let link = self
            .links
            .find_by_code(&code)
            .await?
            .ok_or(AppError::LinkNotFound)?;

        if !link.is_active {
            return Err(AppError::LinkNotFound);
        }

        if link.is_expired() {
            return Err(AppError::LinkExpired);
        }

        let event = ClickEvent::new(link.id, ip, user_agent, referer);
        if self.click_tx.try_send(event).is_err() {
            // Bounded queue is full or the worker is gone; the visitor is
            // redirected regardless.
            warn!(code = %link.code, "click queue full, dropping click event");
        }

        Ok(RedirectDecision {
            target_url: link.url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Link;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::{Duration, Utc};

    fn active_link(code: &str, url: &str) -> Link {
        Link {
            id: 7,
            code: code.to_string(),
            url: url.to_string(),
            is_active: true,
            click_count: 3,
            created_by: None,
            expires_at: None,
            created_at: Utc::now(),
            last_accessed_at: None,
        }
    }

    fn resolver(repo: MockLinkRepository) -> (RedirectService, mpsc::Receiver<ClickEvent>) {
        let (tx, rx) = mpsc::channel(8);
        (RedirectService::new(Arc::new(repo), tx), rx)
    }

    #[tokio::test]
    async fn test_resolve_returns_exact_stored_url() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .returning(|code| Ok(Some(active_link(code, "https://example.com/a/b?c=1"))));

        let (service, _rx) = resolver(repo);
        let decision = service.resolve("abc123", None, None, None).await.unwrap();

        assert_eq!(decision.target_url, "https://example.com/a/b?c=1");
    }

    #[tokio::test]
    async fn test_resolve_unknown_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().returning(|_| Ok(None));

        let (service, _rx) = resolver(repo);
        let result = service.resolve("nothere", None, None, None).await;

        assert!(matches!(result, Err(AppError::LinkNotFound)));
    }

    #[tokio::test]
    async fn test_resolve_inactive_link_answers_like_missing() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().returning(|code| {
            let mut link = active_link(code, "https://example.com");
            link.is_active = false;
            Ok(Some(link))
        });

        let (service, mut rx) = resolver(repo);
        let result = service.resolve("hidden", None, None, None).await;

        assert!(matches!(result, Err(AppError::LinkNotFound)));
        // No click is recorded for a refused resolution.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolve_expired_link_is_gone_not_missing() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().returning(|code| {
            let mut link = active_link(code, "https://example.com");
            link.expires_at = Some(Utc::now() - Duration::hours(1));
            Ok(Some(link))
        });

        let (service, _rx) = resolver(repo);
        let result = service.resolve("oldpromo", None, None, None).await;

        assert!(matches!(result, Err(AppError::LinkExpired)));
    }

    #[tokio::test]
    async fn test_resolve_sanitizes_before_lookup() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|code| Ok(Some(active_link(code, "https://example.com"))));

        let (service, _rx) = resolver(repo);
        let result = service.resolve("abc.12/3;", None, None, None).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_resolve_rejects_code_with_no_valid_characters() {
        // Repository is never consulted for an empty sanitized code.
        let repo = MockLinkRepository::new();

        let (service, _rx) = resolver(repo);
        let result = service.resolve("!!??//", None, None, None).await;

        assert!(matches!(result, Err(AppError::InvalidCode)));
    }

    #[tokio::test]
    async fn test_resolve_emits_click_event_with_metadata() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .returning(|code| Ok(Some(active_link(code, "https://example.com"))));

        let (service, mut rx) = resolver(repo);
        service
            .resolve(
                "abc123",
                Some("192.168.1.1".to_string()),
                Some("Mozilla/5.0"),
                Some("https://google.com"),
            )
            .await
            .unwrap();

        let event = rx.try_recv().unwrap();
        assert_eq!(event.link_id, 7);
        assert_eq!(event.ip.as_deref(), Some("192.168.1.1"));
        assert_eq!(event.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(event.referer.as_deref(), Some("https://google.com"));
    }

    #[tokio::test]
    async fn test_full_click_queue_does_not_fail_redirect() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .returning(|code| Ok(Some(active_link(code, "https://example.com"))));

        let (tx, _rx) = mpsc::channel(1);
        tx.try_send(ClickEvent::new(1, None, None, None)).unwrap();
        let service = RedirectService::new(Arc::new(repo), tx);

        let result = service.resolve("abc123", None, None, None).await;

        assert!(result.is_ok());
    }
}
