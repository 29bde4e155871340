//! HTTP error response conversion
//!
//! HTTP-specific error response conversion for `AppError`.
//!
//! **Preferred handler pattern:** return `Result<impl IntoResponse, HttpAppError>`.
//! Use `AppError` for errors and `?` / `.map_err(Into::into)` so they become
//! `HttpAppError` and render consistently (status, body, logging).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use seva_core::{AppError, ErrorMetadata, LogLevel};
use seva_storage::StorageError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse.
/// Necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from seva-core).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("File not found: {}", key)),
            other => AppError::Storage(other.to_string()),
        })
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let err = self.0;

        match err.log_level() {
            LogLevel::Debug => {
                tracing::debug!(error = %err.detailed_message(), code = err.error_code(), "Request failed")
            }
            LogLevel::Warn => {
                tracing::warn!(error = %err.detailed_message(), code = err.error_code(), "Request failed")
            }
            LogLevel::Error => {
                tracing::error!(error = %err.detailed_message(), code = err.error_code(), "Request failed")
            }
        }

        let status = StatusCode::from_u16(err.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Sensitive details (database/storage internals) stay in the logs.
        let details = if err.is_sensitive() {
            None
        } else {
            Some(err.to_string()).filter(|d| *d != err.client_message())
        };

        let body = ErrorResponse {
            error: err.client_message(),
            details,
            code: err.error_code().to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action().map(|s| s.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
