//! Repository trait for the click access log.

use crate::domain::entities::NewClick;
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only store for click records.
///
/// Writes happen off the request path via the click worker; callers treat
/// failures as diagnostics, never as redirect failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends one click record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record(&self, new_click: NewClick) -> Result<(), AppError>;
}
