//! Link lifecycle service: creation with unique code assignment, inspect,
//! update, delete.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error};
use url::Url;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CODE_ALPHABET, generate, validate_custom_code};

/// Maximum length of a target URL.
pub const MAX_URL_LENGTH: usize = 2000;

/// How many generated candidates are tried before giving up. Exhausting
/// this bound means the code space is too dense and warrants an alert.
const MAX_GENERATION_ATTEMPTS: usize = 100;

/// Service for creating and managing short links.
///
/// Code claiming is delegated to the store's atomic insert-if-absent; this
/// service never checks existence separately from inserting.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    base_url: String,
    code_length: usize,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `base_url` is the public origin used when building short URLs;
    /// `code_length` is the length of generated codes.
    pub fn new(links: Arc<dyn LinkRepository>, base_url: String, code_length: usize) -> Self {
        Self {
            links,
            base_url,
            code_length,
        }
    }

    /// Creates a short link.
    ///
    /// With a custom code: validate its format, then attempt one atomic
    /// insert. With no custom code: generate-and-insert up to
    /// [`MAX_GENERATION_ATTEMPTS`] times.
    ///
    /// `expiration_days` counts from now; `0` produces a link that is
    /// already expired.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an invalid URL
    /// - [`AppError::InvalidCodeFormat`] for a malformed custom code
    /// - [`AppError::CodeAlreadyExists`] when the custom code is taken
    /// - [`AppError::CodeGenerationExhausted`] when every candidate collided
    pub async fn create_link(
        &self,
        url: String,
        custom_code: Option<String>,
        expiration_days: Option<i64>,
        created_by: Option<i64>,
    ) -> Result<Link, AppError> {
        validate_url(&url)?;

        let expires_at: Option<DateTime<Utc>> =
            expiration_days.map(|days| Utc::now() + Duration::days(days));

        if let Some(custom) = custom_code {
            validate_custom_code(&custom)?;

            self.links
                .insert_if_absent(NewLink {
                    code: custom,
                    url,
                    created_by,
                    expires_at,
                })
                .await
        } else {
            self.create_with_generated_code(url, created_by, expires_at)
                .await
        }
    }

    async fn create_with_generated_code(
        &self,
        url: String,
        created_by: Option<i64>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let code = generate(self.code_length, CODE_ALPHABET);

            match self
                .links
                .insert_if_absent(NewLink {
                    code,
                    url: url.clone(),
                    created_by,
                    expires_at,
                })
                .await
            {
                Ok(link) => return Ok(link),
                Err(AppError::CodeAlreadyExists) => {
                    debug!(attempt, "generated code collided, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        error!(
            attempts = MAX_GENERATION_ATTEMPTS,
            code_length = self.code_length,
            "code generation exhausted; code space too dense for current load"
        );
        Err(AppError::CodeGenerationExhausted)
    }

    /// Retrieves a link by code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::LinkNotFound`] when no link matches.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        self.links
            .find_by_code(code)
            .await?
            .ok_or(AppError::LinkNotFound)
    }

    /// Partially updates a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty patch or invalid URL,
    /// [`AppError::LinkNotFound`] when no link matches.
    pub async fn update_link(&self, code: &str, patch: LinkPatch) -> Result<Link, AppError> {
        if patch.is_empty() {
            return Err(AppError::validation("No valid fields to update"));
        }

        if let Some(url) = &patch.url {
            validate_url(url)?;
        }

        self.links.update(code, patch).await
    }

    /// Deletes a link and, by cascade, its click history.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::LinkNotFound`] when no link matches.
    pub async fn delete_link(&self, code: &str) -> Result<(), AppError> {
        let link = self.get_link(code).await?;
        self.links.delete(link.id).await
    }

    /// Lists links (newest first) with the total count for pagination.
    pub async fn list_links(
        &self,
        page: i64,
        per_page: i64,
        created_by: Option<i64>,
    ) -> Result<(Vec<Link>, i64), AppError> {
        let links = self.links.list(page, per_page, created_by).await?;
        let total = self.links.count(created_by).await?;
        Ok((links, total))
    }

    /// Counts all links. Doubles as the health check's store probe.
    pub async fn count_links(&self) -> Result<i64, AppError> {
        self.links.count(None).await
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }
}

/// Validates a target URL: absolute, http or https, at most
/// [`MAX_URL_LENGTH`] characters.
fn validate_url(url: &str) -> Result<(), AppError> {
    if url.is_empty() {
        return Err(AppError::validation("URL is required"));
    }

    if url.len() > MAX_URL_LENGTH {
        return Err(AppError::validation(format!(
            "URL must not exceed {MAX_URL_LENGTH} characters"
        )));
    }

    let parsed = Url::parse(url).map_err(|_| AppError::validation("Invalid URL format"))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(AppError::validation("URL must use http or https"));
    }

    Ok(())
}
