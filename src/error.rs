//! Application error taxonomy and HTTP response mapping.
//!
//! Every failure surfaced by services or repositories is an [`AppError`].
//! The [`IntoResponse`] impl renders the JSON error envelope used by the API:
//!
//! ```json
//! { "success": false, "error": "Code already exists", "error_code": "CODE_ALREADY_EXISTS" }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// All error outcomes the service can produce.
///
/// The redirect path intentionally collapses some outcomes: an inactive link
/// resolves to [`AppError::LinkNotFound`] so that disabled links are
/// indistinguishable from codes that never existed.
#[derive(Debug, Error)]
pub enum AppError {
    /// Inbound code was empty after sanitization. Surfaced as 404.
    #[error("Link not found")]
    InvalidCode,

    /// A custom code failed format validation (length or character set).
    #[error("{0}")]
    InvalidCodeFormat(String),

    /// Request payload failed validation.
    #[error("{0}")]
    Validation(String),

    /// No link with this code, or the link is deactivated.
    #[error("Link not found")]
    LinkNotFound,

    /// The link exists but its expiry time has passed.
    #[error("Link has expired")]
    LinkExpired,

    /// A creation attempt lost the race for this code.
    #[error("Code already exists")]
    CodeAlreadyExists,

    /// Every generated candidate collided with an existing code.
    /// Indicates the code space is too small for the current link count.
    #[error("Failed to generate a unique code")]
    CodeGenerationExhausted,

    /// Missing, malformed, or revoked API credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Unexpected failure (database, I/O). Details stay in the logs.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCode | Self::LinkNotFound => StatusCode::NOT_FOUND,
            Self::LinkExpired => StatusCode::GONE,
            Self::InvalidCodeFormat(_) | Self::Validation(_) | Self::CodeAlreadyExists => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::CodeGenerationExhausted | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for the error envelope.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCode | Self::LinkNotFound => "NOT_FOUND",
            Self::LinkExpired => "LINK_EXPIRED",
            Self::InvalidCodeFormat(_) => "INVALID_CODE_FORMAT",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::CodeAlreadyExists => "CODE_ALREADY_EXISTS",
            Self::CodeGenerationExhausted => "CODE_GENERATION_EXHAUSTED",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Internal(_) => "SERVER_ERROR",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    error_code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorBody {
            success: false,
            // Internal details are logged, not leaked to the client.
            error: if matches!(self, Self::Internal(_)) {
                "Server error".to_string()
            } else {
                self.to_string()
            },
            error_code: self.error_code(),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return Self::CodeAlreadyExists;
        }

        tracing::error!(error = %e, "database error");
        Self::Internal("Database error".to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::Validation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::LinkNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidCode.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::LinkExpired.status_code(), StatusCode::GONE);
        assert_eq!(
            AppError::CodeAlreadyExists.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::CodeGenerationExhausted.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::unauthorized("no token").status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_inactive_and_missing_share_error_code() {
        // Disabled links must be indistinguishable from unknown codes.
        assert_eq!(
            AppError::LinkNotFound.error_code(),
            AppError::InvalidCode.error_code()
        );
    }

    #[test]
    fn test_error_codes_are_screaming_snake() {
        let errors = [
            AppError::InvalidCode,
            AppError::InvalidCodeFormat("x".into()),
            AppError::Validation("x".into()),
            AppError::LinkNotFound,
            AppError::LinkExpired,
            AppError::CodeAlreadyExists,
            AppError::CodeGenerationExhausted,
            AppError::Unauthorized("x".into()),
            AppError::Internal("x".into()),
        ];
        for e in errors {
            assert!(
                e.error_code()
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c == '_'),
                "bad error code: {}",
                e.error_code()
            );
        }
    }

    #[test]
    fn test_internal_message_not_exposed() {
        let response = AppError::internal("secret detail").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
