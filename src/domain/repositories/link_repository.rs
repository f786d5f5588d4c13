//! Repository trait for short link storage.

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// The Link Store contract. Owns the code-uniqueness invariant and the
/// click counter; all shared mutable link state lives behind this trait.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Atomically claims `new_link.code` and inserts the link.
    ///
    /// The uniqueness check and the write are indivisible from the
    /// perspective of concurrent callers: for a given code, at most one
    /// insert succeeds, enforced by the storage engine's unique constraint.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeAlreadyExists`] when the code is taken and
    /// [`AppError::Internal`] on database errors.
    async fn insert_if_absent(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Point lookup by code. This is the redirect hot path.
    ///
    /// Returns the link regardless of its activation or expiry state; policy
    /// decisions belong to the resolver.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Point lookup by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Atomically increments `click_count` by 1 and sets `last_accessed_at`
    /// to now. A single storage-level increment; concurrent calls for the
    /// same link never lose updates.
    async fn increment_click_and_touch(&self, link_id: i64) -> Result<(), AppError>;

    /// Partially updates a link. Fields left `None` are unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::LinkNotFound`] if no link matches `code`.
    async fn update(&self, code: &str, patch: LinkPatch) -> Result<Link, AppError>;

    /// Deletes a link. Its click rows are removed by cascade.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::LinkNotFound`] if no link matches `id`.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Lists links ordered by creation time, newest first.
    ///
    /// `page` is 1-indexed. `created_by` filters to one owner when set.
    async fn list(
        &self,
        page: i64,
        per_page: i64,
        created_by: Option<i64>,
    ) -> Result<Vec<Link>, AppError>;

    /// Counts links, optionally for a single owner.
    async fn count(&self, created_by: Option<i64>) -> Result<i64, AppError>;
}
