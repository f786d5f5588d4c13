#![allow(dead_code)]

//! Shared fixtures for handler-level integration tests.
//!
//! The HTTP surface is exercised against in-memory repository doubles, so
//! the full middleware/handler/service stack runs without a database. The
//! doubles mirror the PostgreSQL behavior the services rely on: atomic
//! code claims, cascade click deletion, and newest-first listing.

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicI64, Ordering},
};
use tokio::sync::mpsc;
use tower::Layer;

use shortlink::application::services::{AuthService, LinkService, RedirectService, hash_token};
use shortlink::domain::click_event::ClickEvent;
use shortlink::domain::entities::{Click, Link, LinkPatch, NewClick, NewLink};
use shortlink::domain::repositories::{ApiToken, ClickRepository, LinkRepository, TokenRepository};
use shortlink::error::AppError;
use shortlink::state::AppState;

pub const TEST_SIGNING_SECRET: &str = "test-signing-secret";
pub const TEST_TOKEN: &str = "test-token-abcdef0123456789";

/// In-memory link store honoring the same contract as the PostgreSQL
/// implementation: one winner per code, cascade on delete.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    next_id: AtomicI64,
    links: Mutex<HashMap<String, Link>>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            links: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, code: &str) -> Option<Link> {
        self.links.lock().unwrap().get(code).cloned()
    }

    pub fn len(&self) -> usize {
        self.links.lock().unwrap().len()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert_if_absent(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut links = self.links.lock().unwrap();
        if links.contains_key(&new_link.code) {
            return Err(AppError::CodeAlreadyExists);
        }

        let link = Link {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            code: new_link.code.clone(),
            url: new_link.url,
            is_active: true,
            click_count: 0,
            created_by: new_link.created_by,
            expires_at: new_link.expires_at,
            created_at: Utc::now(),
            last_accessed_at: None,
        };
        links.insert(new_link.code, link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.lock().unwrap().get(code).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .values()
            .find(|l| l.id == id)
            .cloned())
    }

    async fn increment_click_and_touch(&self, link_id: i64) -> Result<(), AppError> {
        let mut links = self.links.lock().unwrap();
        if let Some(link) = links.values_mut().find(|l| l.id == link_id) {
            link.click_count += 1;
            link.last_accessed_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn update(&self, code: &str, patch: LinkPatch) -> Result<Link, AppError> {
        let mut links = self.links.lock().unwrap();
        let link = links.get_mut(code).ok_or(AppError::LinkNotFound)?;

        if let Some(url) = patch.url {
            link.url = url;
        }
        if let Some(is_active) = patch.is_active {
            link.is_active = is_active;
        }
        if let Some(expires_at) = patch.expires_at {
            link.expires_at = expires_at;
        }
        Ok(link.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut links = self.links.lock().unwrap();
        let code = links
            .values()
            .find(|l| l.id == id)
            .map(|l| l.code.clone())
            .ok_or(AppError::LinkNotFound)?;
        links.remove(&code);
        Ok(())
    }

    async fn list(
        &self,
        page: i64,
        per_page: i64,
        created_by: Option<i64>,
    ) -> Result<Vec<Link>, AppError> {
        let mut links: Vec<Link> = self
            .links
            .lock()
            .unwrap()
            .values()
            .filter(|l| created_by.is_none_or(|owner| l.created_by == Some(owner)))
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let offset = ((page - 1) * per_page) as usize;
        Ok(links
            .into_iter()
            .skip(offset)
            .take(per_page as usize)
            .collect())
    }

    async fn count(&self, created_by: Option<i64>) -> Result<i64, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .values()
            .filter(|l| created_by.is_none_or(|owner| l.created_by == Some(owner)))
            .count() as i64)
    }
}

/// Append-only in-memory click log.
#[derive(Default)]
pub struct InMemoryClickRepository {
    next_id: AtomicI64,
    clicks: Mutex<Vec<Click>>,
}

impl InMemoryClickRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            clicks: Mutex::new(Vec::new()),
        }
    }

    pub fn all(&self) -> Vec<Click> {
        self.clicks.lock().unwrap().clone()
    }

    pub fn count_for(&self, link_id: i64) -> usize {
        self.clicks
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.link_id == link_id)
            .count()
    }
}

#[async_trait]
impl ClickRepository for InMemoryClickRepository {
    async fn record(&self, new_click: NewClick) -> Result<(), AppError> {
        self.clicks.lock().unwrap().push(Click {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            link_id: new_click.link_id,
            ip: new_click.ip,
            user_agent: new_click.user_agent,
            referer: new_click.referer,
            created_at: Utc::now(),
        });
        Ok(())
    }
}

/// In-memory token store pre-seeded via [`seed_token`].
#[derive(Default)]
pub struct InMemoryTokenRepository {
    next_id: AtomicI64,
    tokens: Mutex<Vec<ApiToken>>,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn seed_token(&self, name: &str, token_hash: &str) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().push(ApiToken {
            id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        });
        id
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn find_valid(&self, token_hash: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token_hash == token_hash && t.revoked_at.is_none())
            .cloned())
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        if let Some(token) = tokens.iter_mut().find(|t| t.token_hash == token_hash) {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(&self, name: &str, token_hash: &str) -> Result<ApiToken, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let token = ApiToken {
            id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        self.tokens.lock().unwrap().push(token.clone());
        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        Ok(self.tokens.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<bool, AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens
            .iter_mut()
            .find(|t| t.id == id && t.revoked_at.is_none())
        {
            Some(token) => {
                token.revoked_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Everything a handler test needs: the app state, the click event
/// receiver, and handles to the stores for direct assertions.
pub struct TestContext {
    pub state: AppState,
    pub click_rx: mpsc::Receiver<ClickEvent>,
    pub links: Arc<InMemoryLinkRepository>,
    pub clicks: Arc<InMemoryClickRepository>,
    pub tokens: Arc<InMemoryTokenRepository>,
    /// Id of the pre-seeded token that [`TEST_TOKEN`] authenticates as.
    pub token_id: i64,
}

pub fn create_test_context() -> TestContext {
    let links = Arc::new(InMemoryLinkRepository::new());
    let clicks = Arc::new(InMemoryClickRepository::new());
    let tokens = Arc::new(InMemoryTokenRepository::new());

    let token_id = tokens.seed_token("Test token", &hash_token(TEST_SIGNING_SECRET, TEST_TOKEN));

    let (click_tx, click_rx) = mpsc::channel(100);

    let link_service = Arc::new(LinkService::new(
        links.clone(),
        "http://sho.rt".to_string(),
        6,
    ));
    let redirect_service = Arc::new(RedirectService::new(links.clone(), click_tx.clone()));
    let auth_service = Arc::new(AuthService::new(
        tokens.clone(),
        TEST_SIGNING_SECRET.to_string(),
    ));

    let state = AppState::new(
        link_service,
        redirect_service,
        auth_service,
        click_tx,
        false,
    );

    TestContext {
        state,
        click_rx,
        links,
        clicks,
        tokens,
        token_id,
    }
}

pub async fn create_test_link(links: &InMemoryLinkRepository, code: &str, url: &str) -> Link {
    links
        .insert_if_absent(NewLink {
            code: code.to_string(),
            url: url.to_string(),
            created_by: None,
            expires_at: None,
        })
        .await
        .unwrap()
}

pub async fn create_expired_link(links: &InMemoryLinkRepository, code: &str, url: &str) -> Link {
    links
        .insert_if_absent(NewLink {
            code: code.to_string(),
            url: url.to_string(),
            created_by: None,
            expires_at: Some(Utc::now() - chrono::Duration::hours(1)),
        })
        .await
        .unwrap()
}

pub async fn create_inactive_link(links: &InMemoryLinkRepository, code: &str, url: &str) -> Link {
    create_test_link(links, code, url).await;
    links
        .update(
            code,
            LinkPatch {
                url: None,
                is_active: Some(false),
                expires_at: None,
            },
        )
        .await
        .unwrap()
}

/// Injects a fixed peer address so handlers using `ConnectInfo` work
/// without a real socket.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// The full application router wrapped with the mock peer address, minus
/// the rate limiter (per-IP buckets would couple unrelated tests).
pub fn test_router(state: AppState) -> axum::Router {
    use axum::{Router, middleware, routing::get};
    use shortlink::api;
    use shortlink::api::handlers::{health_handler, redirect_handler};
    use shortlink::api::middleware::auth;

    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(MockConnectInfoLayer)
}

/// One `DateTime` close enough to another that wall-clock jitter between
/// the call and the assertion does not matter.
pub fn roughly_now(ts: DateTime<Utc>) -> bool {
    (Utc::now() - ts).num_seconds().abs() < 5
}
