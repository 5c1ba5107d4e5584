//! Background artwork generation.
//!
//! Image generation is best effort: every failure collapses into an
//! [`ImageOutcome`] that callers can render as "no image".

use crate::model::GenerativeModel;
use crate::prompts::compose_background_prompt;
use crate::types::{GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

/// Default model for background art
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Aspect ratio requested for backgrounds; the ticket crops it further.
pub const BACKGROUND_ASPECT_RATIO: &str = "16:9";

const FALLBACK_IMAGE_MIME: &str = "image/png";

/// Result of one background generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// The prompt was blank so nothing was sent
    NotAttempted,
    /// The model returned an image
    Generated {
        /// `data:<mime>;base64,<payload>`
        data_uri: String,
    },
    /// The model answered with text only
    Declined {
        /// Text the model returned instead of an image
        notes: Vec<String>,
    },
    /// The request itself failed
    Failed {
        /// Error description
        reason: String,
    },
}

impl ImageOutcome {
    /// The image as a data URI, or `""` when there is none.
    #[must_use]
    pub fn data_uri(&self) -> &str {
        match self {
            Self::Generated { data_uri } => data_uri,
            _ => "",
        }
    }

    /// Consume into the data URI, or `""` when there is none.
    #[must_use]
    pub fn into_data_uri(self) -> String {
        match self {
            Self::Generated { data_uri } => data_uri,
            _ => String::new(),
        }
    }

    /// Whether an image was produced.
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        matches!(self, Self::Generated { .. })
    }

    /// Short label for logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotAttempted => "not_attempted",
            Self::Generated { .. } => "generated",
            Self::Declined { .. } => "declined",
            Self::Failed { .. } => "failed",
        }
    }

    fn from_response(response: &GenerateContentResponse) -> Self {
        let parts = response.parts();

        if let Some(blob) = parts
            .iter()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|b| !b.data.trim().is_empty())
        {
            let mime = if blob.mime_type.trim().is_empty() {
                FALLBACK_IMAGE_MIME
            } else {
                blob.mime_type.as_str()
            };
            return Self::Generated {
                data_uri: format!("data:{mime};base64,{}", blob.data.trim()),
            };
        }

        let notes = parts
            .iter()
            .filter_map(|p| p.text.clone())
            .filter(|t| !t.trim().is_empty())
            .collect();
        Self::Declined { notes }
    }
}

/// Renders background art from a scene prompt.
#[derive(Debug, Clone)]
pub struct ImageGenerator<M> {
    model: M,
    model_name: String,
}

impl<M: GenerativeModel> ImageGenerator<M> {
    /// Generator using [`DEFAULT_IMAGE_MODEL`].
    #[must_use]
    pub fn new(model: M) -> Self {
        Self {
            model,
            model_name: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }

    /// Builder: Set model name
    #[must_use]
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Model name requests are sent to.
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Build the request for `prompt` without sending it.
    #[must_use]
    pub fn build_request(prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest::new(vec![Part::text(compose_background_prompt(prompt))])
            .with_generation_config(GenerationConfig::image(BACKGROUND_ASPECT_RATIO))
    }

    /// Generate background art for `prompt`.
    ///
    /// Never fails: check [`ImageOutcome::is_generated`] or use
    /// [`ImageOutcome::data_uri`], which is empty when nothing was produced.
    pub async fn generate(&self, prompt: &str) -> ImageOutcome {
        if prompt.trim().is_empty() {
            tracing::debug!("Blank background prompt, skipping image generation");
            return ImageOutcome::NotAttempted;
        }

        let request = Self::build_request(prompt);
        let outcome = match self.model.generate_content(&self.model_name, &request).await {
            Ok(response) => ImageOutcome::from_response(&response),
            Err(e) => ImageOutcome::Failed {
                reason: e.to_string(),
            },
        };

        match &outcome {
            ImageOutcome::Generated { data_uri } => {
                tracing::info!(model = %self.model_name, bytes = data_uri.len(), "Background generated");
            }
            ImageOutcome::Declined { notes } => {
                for note in notes {
                    tracing::warn!(model = %self.model_name, note = %note, "Model returned text instead of image");
                }
                if notes.is_empty() {
                    tracing::warn!(model = %self.model_name, "Model returned no image");
                }
            }
            ImageOutcome::Failed { reason } => {
                tracing::error!(model = %self.model_name, error = %reason, "Error generating background image");
            }
            ImageOutcome::NotAttempted => {}
        }
        metrics::counter!("prettytickets_generations_total", "kind" => "image", "outcome" => outcome.as_str())
            .increment(1);

        outcome
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::error::GenAiError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct OneShot {
        reply: fn() -> Result<GenerateContentResponse, GenAiError>,
        calls: AtomicUsize,
    }

    impl OneShot {
        fn new(reply: fn() -> Result<GenerateContentResponse, GenAiError>) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl GenerativeModel for OneShot {
        async fn generate_content(
            &self,
            _model: &str,
            _request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse, GenAiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.reply)()
        }
    }

    fn response(parts: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(json!({ "candidates": [{ "content": { "parts": parts } }] })).unwrap()
    }

    #[tokio::test]
    async fn test_first_inline_part_wins() {
        let generator = ImageGenerator::new(OneShot::new(|| {
            Ok(response(json!([
                { "text": "Here you go" },
                { "inlineData": { "mimeType": "image/jpeg", "data": "AAAA" } },
                { "inlineData": { "mimeType": "image/png", "data": "BBBB" } }
            ])))
        }));

        let outcome = generator.generate("aurora").await;
        assert!(outcome.is_generated());
        assert_eq!(outcome.data_uri(), "data:image/jpeg;base64,AAAA");
    }

    #[tokio::test]
    async fn test_missing_mime_defaults_to_png() {
        let generator = ImageGenerator::new(OneShot::new(|| {
            Ok(response(json!([{ "inlineData": { "mimeType": "", "data": "AAAA" } }])))
        }));

        assert_eq!(
            generator.generate("aurora").await.into_data_uri(),
            "data:image/png;base64,AAAA"
        );
    }

    #[tokio::test]
    async fn test_empty_inline_data_is_not_an_image() {
        let empty = ImageGenerator::new(OneShot::new(|| {
            Ok(response(json!([
                { "inlineData": { "mimeType": "image/png", "data": "" } },
                { "text": "Nothing rendered" }
            ])))
        }));
        let outcome = empty.generate("aurora").await;
        assert_eq!(
            outcome,
            ImageOutcome::Declined {
                notes: vec!["Nothing rendered".to_string()]
            }
        );
        assert_eq!(outcome.data_uri(), "");

        let later = ImageGenerator::new(OneShot::new(|| {
            Ok(response(json!([
                { "inlineData": { "mimeType": "image/png", "data": "  " } },
                { "inlineData": { "mimeType": "image/webp", "data": "UklGRg==" } }
            ])))
        }));
        assert_eq!(
            later.generate("aurora").await.into_data_uri(),
            "data:image/webp;base64,UklGRg=="
        );
    }

    #[tokio::test]
    async fn test_text_only_response_is_declined() {
        let generator = ImageGenerator::new(OneShot::new(|| {
            Ok(response(json!([{ "text": "I can't draw that." }])))
        }));

        let outcome = generator.generate("a famous singer").await;
        assert_eq!(
            outcome,
            ImageOutcome::Declined {
                notes: vec!["I can't draw that.".to_string()]
            }
        );
        assert_eq!(outcome.data_uri(), "");
    }

    #[tokio::test]
    async fn test_transport_error_is_absorbed() {
        let generator = ImageGenerator::new(OneShot::new(|| Err(GenAiError::RateLimited)));

        let outcome = generator.generate("aurora").await;
        assert!(matches!(outcome, ImageOutcome::Failed { .. }));
        assert_eq!(outcome.into_data_uri(), "");
    }

    #[tokio::test]
    async fn test_blank_prompt_skips_request() {
        let generator = ImageGenerator::new(OneShot::new(|| Ok(GenerateContentResponse::default())));

        assert_eq!(generator.generate("   ").await, ImageOutcome::NotAttempted);
        assert_eq!(generator.model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_request_shape() {
        let request = ImageGenerator::<OneShot>::build_request("glowing stage");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body["generationConfig"]["responseModalities"],
            json!(["IMAGE", "TEXT"])
        );
        assert_eq!(body["generationConfig"]["imageConfig"]["aspectRatio"], "16:9");
        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("glowing stage."));
        assert!(text.ends_with("No text, no words."));
    }
}
