//! Scripted generative model.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)]

use prettytickets_genai::{
    GenAiError, GenerateContentRequest, GenerateContentResponse, GenerativeModel,
};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// [`GenerativeModel`] that replays queued responses in order and records
/// every request it receives.
///
/// Clones share the same queue and log, so a test can keep one handle while a
/// generator owns another. An exhausted queue answers with a 500 API error.
///
/// # Example
///
/// ```
/// use prettytickets_testing::ScriptedModel;
///
/// let model = ScriptedModel::new();
/// model.push_text("{}").push_refusal("I can't draw that.");
/// assert_eq!(model.pending(), 2);
/// ```
#[derive(Clone, Default)]
pub struct ScriptedModel {
    responses: Arc<Mutex<VecDeque<Result<GenerateContentResponse, GenAiError>>>>,
    requests: Arc<Mutex<Vec<(String, GenerateContentRequest)>>>,
}

impl ScriptedModel {
    /// Create a model with an empty script
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response or error.
    pub fn push(&self, response: Result<GenerateContentResponse, GenAiError>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Queue a candidate whose only part is `text`.
    pub fn push_text(&self, text: &str) -> &Self {
        self.push(Ok(parts_response(&json!([{ "text": text }]))))
    }

    /// Queue a text answer containing `document` serialized as JSON.
    pub fn push_json(&self, document: &Value) -> &Self {
        self.push_text(&document.to_string())
    }

    /// Queue an image answer.
    pub fn push_image(&self, mime_type: &str, data: &str) -> &Self {
        self.push(Ok(parts_response(&json!([
            { "inlineData": { "mimeType": mime_type, "data": data } }
        ]))))
    }

    /// Queue a text-only answer to an image request.
    pub fn push_refusal(&self, text: &str) -> &Self {
        self.push_text(text)
    }

    /// Queue an error.
    pub fn push_error(&self, error: GenAiError) -> &Self {
        self.push(Err(error))
    }

    /// Responses not yet consumed
    #[must_use]
    pub fn pending(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    /// Every `(model, request)` received, oldest first
    #[must_use]
    pub fn requests(&self) -> Vec<(String, GenerateContentRequest)> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl std::fmt::Debug for ScriptedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedModel")
            .field("pending", &self.pending())
            .field("requests", &self.request_count())
            .finish()
    }
}

impl GenerativeModel for ScriptedModel {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenAiError> {
        self.requests
            .lock()
            .unwrap()
            .push((model.to_string(), request.clone()));

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(GenAiError::ApiError {
                    status: 500,
                    message: "no scripted response".to_string(),
                })
            })
    }
}

fn parts_response(parts: &Value) -> GenerateContentResponse {
    serde_json::from_value(json!({
        "candidates": [{ "content": { "role": "model", "parts": parts }, "finishReason": "STOP" }]
    }))
    .unwrap()
}
