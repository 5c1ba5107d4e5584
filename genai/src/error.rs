//! Error types for the generative-content client and generators

use prettytickets_core::SchemaViolation;
use thiserror::Error;

/// Errors that can occur when generating ticket content
#[derive(Debug, Error)]
pub enum GenAiError {
    /// No API key configured
    #[error("Missing Gemini API key: set GEMINI_API_KEY")]
    MissingApiKey,

    /// Neither text nor an image was supplied
    #[error("Provide ticket text, a ticket image, or both")]
    EmptyInput,

    /// Supplied image is not usable base64 image data
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response parsing failed
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Rate limited - too many requests
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Unauthorized - invalid API key
    #[error("Unauthorized - invalid API key")]
    Unauthorized,

    /// API returned an error
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// The model answered without any text part
    #[error("No text response from the model")]
    NoTextResponse,

    /// The model's text is not the expected JSON document
    #[error("Malformed model output: {0}")]
    MalformedOutput(String),

    /// The model's JSON does not satisfy the ticket schema
    #[error("Model output violates the ticket schema: {0}")]
    Schema(#[from] SchemaViolation),
}

impl GenAiError {
    /// Whether the failure happened talking to the remote service.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed(_)
                | Self::ResponseParseFailed(_)
                | Self::RateLimited
                | Self::Unauthorized
                | Self::ApiError { .. }
        )
    }
}
