//! Authentication service for API token validation.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::repositories::TokenRepository;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// The authenticated principal for one request.
///
/// Built by the auth middleware after token validation and carried as a
/// request extension; handlers take it explicitly instead of reading any
/// ambient session state. `token_id` is recorded as link ownership.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub token_id: i64,
    pub token_name: String,
}

/// Hashes a raw token with HMAC-SHA256 under the server signing secret.
///
/// Returns a 64-character lowercase hex MAC. Keyed hashing means read-only
/// access to the database is not enough to verify or forge tokens.
pub fn hash_token(signing_secret: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Service for authenticating API requests via Bearer tokens.
pub struct AuthService {
    tokens: Arc<dyn TokenRepository>,
    signing_secret: String,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// `signing_secret` must match the value used when tokens were created.
    pub fn new(tokens: Arc<dyn TokenRepository>, signing_secret: String) -> Self {
        Self {
            tokens,
            signing_secret,
        }
    }

    /// Authenticates a raw token and returns the request principal.
    ///
    /// Stamps `last_used_at` on success for audit; that write is
    /// best-effort and never fails the authentication.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for unknown or revoked tokens and
    /// [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<AuthContext, AppError> {
        let token_hash = hash_token(&self.signing_secret, token);

        let stored = self
            .tokens
            .find_valid(&token_hash)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid or revoked token"))?;

        let _ = self.tokens.update_last_used(&token_hash).await;

        Ok(AuthContext {
            token_id: stored.id,
            token_name: stored.name,
        })
    }
}
