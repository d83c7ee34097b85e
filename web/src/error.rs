//! Error types for web handlers.
//!
//! [`AppError`] bridges domain errors and HTTP responses. The message is
//! already localized when the error is built, so `into_response` only has to
//! serialize it.

use crate::extractors::Messages;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use todolist_core::{MessageId, TodoError, ValidationError};

/// Application error type for web handlers.
///
/// # Status mapping
///
/// | Cause | Status |
/// |---|---|
/// | Bad query or path value (group filter, status, sort) | 400 |
/// | Unknown id | 404 |
/// | No id left to assign | 409 |
/// | Bad request body or non-numeric path segment | 422 |
/// | Storage failure, missing index page | 500 |
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Attach the underlying cause, logged for server errors.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            message.into(),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 409 Conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message.into(), "CONFLICT".to_string())
    }

    /// Create a 422 Unprocessable Entity error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            message.into(),
            "VALIDATION_ERROR".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// Map a store error: validation → 400, not found → 404, exhausted ids →
    /// 409, storage → 500.
    #[must_use]
    pub fn from_todo_error(error: TodoError, messages: &Messages) -> Self {
        let message = messages.text(error.message_id());
        match error {
            TodoError::Validation(_) => Self::bad_request(message),
            TodoError::NotFound(_) => Self::not_found(message),
            TodoError::IdsExhausted => Self::conflict(message),
            TodoError::Storage(source) => Self::internal(message).with_source(source),
        }
    }

    /// Map a rejected request body to 422.
    #[must_use]
    pub fn invalid_body(error: &ValidationError, messages: &Messages) -> Self {
        Self::validation(messages.text(error.message_id()))
    }

    /// A body or path segment that could not be deserialized at all (422).
    #[must_use]
    pub fn malformed(messages: &Messages, detail: impl fmt::Display) -> Self {
        tracing::debug!(%detail, "Rejected malformed request");
        Self::validation(messages.text(MessageId::InvalidBody))
    }

    /// HTTP status this error renders with
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Client-facing error code
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Localized message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            match &self.source {
                Some(source) => tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    error = %source,
                    "Internal server error"
                ),
                None => tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    "Internal server error"
                ),
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::{Locale, StaticCatalog};
    use std::sync::Arc;
    use todolist_core::{RepositoryError, TodoId};

    fn english() -> Messages {
        Messages::new(Locale::En, Arc::new(StaticCatalog))
    }

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_store_errors_map_to_status_codes() {
        let messages = english();

        let err = AppError::from_todo_error(ValidationError::InvalidGroup(0).into(), &messages);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Group ID must be between 1 and 9");

        let err = AppError::from_todo_error(TodoError::NotFound(TodoId::new(4)), &messages);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "To-Do item not found");

        let err = AppError::from_todo_error(TodoError::IdsExhausted, &messages);
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "CONFLICT");

        let err = AppError::from_todo_error(
            RepositoryError::Io(std::io::Error::other("disk full")).into(),
            &messages,
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_body_errors_are_unprocessable() {
        let messages = Messages::new(Locale::Ko, Arc::new(StaticCatalog));
        let err = AppError::invalid_body(&ValidationError::MissingTitle, &messages);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.message(), "제목은 필수입니다");
    }
}
