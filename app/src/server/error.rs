//! HTTP error responses.
//!
//! [`AppError`] bridges generator and store errors to JSON error bodies of the
//! form `{"code": "...", "message": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use prettytickets_core::StoreError;
use prettytickets_genai::GenAiError;
use serde::Serialize;
use std::fmt;

/// Application error type for handlers.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    /// User-facing message
    message: String,
    /// Stable code for client error handling
    code: &'static str,
    /// Internal error (logged, not exposed to the client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>, code: &'static str) -> Self {
        Self {
            status,
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Attach the underlying error for logging.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// 400 Bad Request
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "BAD_REQUEST")
    }

    /// 404 Not Found
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} with id {id} not found"),
            "NOT_FOUND",
        )
    }

    /// 422 Unprocessable Entity
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message, "VALIDATION_ERROR")
    }

    /// 429 Too Many Requests
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, message, "RATE_LIMITED")
    }

    /// 500 Internal Server Error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
            "INTERNAL_SERVER_ERROR",
        )
    }

    /// 502 Bad Gateway
    #[must_use]
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message, "UPSTREAM_ERROR")
    }

    /// 503 Service Unavailable
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message, "SERVICE_UNAVAILABLE")
    }

    /// HTTP status of the response
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Stable error code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
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

#[derive(Debug, Serialize)]
struct ErrorResponse {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            match &self.source {
                Some(source) => tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    error = %source,
                    "Request failed"
                ),
                None => tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    "Request failed"
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

impl From<GenAiError> for AppError {
    fn from(err: GenAiError) -> Self {
        match &err {
            GenAiError::MissingApiKey => Self::unavailable(err.to_string()),
            GenAiError::EmptyInput | GenAiError::InvalidImage(_) => {
                Self::validation(err.to_string())
            }
            GenAiError::RateLimited => Self::rate_limited(err.to_string()),
            _ if err.is_transport() => {
                Self::upstream("The design service is unavailable").with_source(err)
            }
            _ => Self::upstream("The design service returned an unusable ticket").with_source(err),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::internal("Ticket storage failed").with_source(err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use prettytickets_core::SchemaViolation;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_not_found() {
        let err = AppError::not_found("Ticket", "123");
        assert_eq!(err.to_string(), "[NOT_FOUND] Ticket with id 123 not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_generation_error_statuses() {
        let cases = [
            (GenAiError::MissingApiKey, StatusCode::SERVICE_UNAVAILABLE),
            (GenAiError::EmptyInput, StatusCode::UNPROCESSABLE_ENTITY),
            (
                GenAiError::InvalidImage("not base64".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (GenAiError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (GenAiError::Unauthorized, StatusCode::BAD_GATEWAY),
            (
                GenAiError::ApiError {
                    status: 500,
                    message: "boom".to_string(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                GenAiError::MalformedOutput("eof".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_upstream_messages_split_transport_from_content() {
        let transport = AppError::from(GenAiError::RequestFailed("connection reset".to_string()));
        let content = AppError::from(GenAiError::NoTextResponse);

        assert_eq!(transport.status(), StatusCode::BAD_GATEWAY);
        assert!(transport.to_string().contains("unavailable"));
        assert_eq!(content.status(), StatusCode::BAD_GATEWAY);
        assert!(content.to_string().contains("unusable ticket"));
    }

    #[test]
    fn test_schema_error_is_upstream() {
        let violation: SchemaViolation = prettytickets_core::ticket_record_schema()
            .validate(&serde_json::json!({}))
            .unwrap_err();

        let err = AppError::from(GenAiError::Schema(violation));

        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.code(), "UPSTREAM_ERROR");
    }

    #[test]
    fn test_store_error_is_internal_and_hides_detail() {
        let err: AppError = StoreError::Database("password=hunter2".to_string()).into();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains("hunter2"));
    }
}
