//! The seam between the generators and the remote model.

use crate::error::GenAiError;
use crate::types::{GenerateContentRequest, GenerateContentResponse};
use std::future::Future;
use std::sync::Arc;

/// Anything that can answer a `generateContent` request.
///
/// [`GeminiClient`](crate::GeminiClient) is the production implementation;
/// tests substitute a scripted fake.
pub trait GenerativeModel: Send + Sync {
    /// Send `request` to `model`.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError`] for transport, status or decoding failures.
    fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> impl Future<Output = Result<GenerateContentResponse, GenAiError>> + Send;
}

impl<M: GenerativeModel> GenerativeModel for Arc<M> {
    fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> impl Future<Output = Result<GenerateContentResponse, GenAiError>> + Send {
        self.as_ref().generate_content(model, request)
    }
}
