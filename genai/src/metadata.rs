//! Ticket metadata generation.
//!
//! Builds one structured-output request from the user's text and/or image,
//! then turns the model's JSON into a validated [`TicketRecord`]. Failures are
//! returned to the caller unchanged; nothing is retried here.

use crate::error::GenAiError;
use crate::input::TicketInput;
use crate::model::GenerativeModel;
use crate::prompts::{DEFAULT_IMAGE_INSTRUCTION, SYSTEM_INSTRUCTION};
use crate::types::{GenerateContentRequest, GenerationConfig, Part};
use prettytickets_core::{SchemaNode, TicketRecord, ticket_record_schema};
use serde_json::Value;

/// Default model for metadata
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Turns ticket text/images into [`TicketRecord`]s.
#[derive(Debug, Clone)]
pub struct MetadataGenerator<M> {
    model: M,
    model_name: String,
    schema: SchemaNode,
}

impl<M: GenerativeModel> MetadataGenerator<M> {
    /// Generator using [`DEFAULT_TEXT_MODEL`].
    #[must_use]
    pub fn new(model: M) -> Self {
        Self {
            model,
            model_name: DEFAULT_TEXT_MODEL.to_string(),
            schema: ticket_record_schema(),
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

    /// Build the request for `input` without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::EmptyInput`] when neither text nor image is
    /// present, or [`GenAiError::InvalidImage`] for a malformed image.
    pub fn build_request(&self, input: &TicketInput) -> Result<GenerateContentRequest, GenAiError> {
        let text = input.trimmed_text();
        let image = input.inline_image()?;

        let parts = match (text, image) {
            (None, None) => return Err(GenAiError::EmptyInput),
            (Some(text), None) => vec![Part::text(text)],
            (text, Some(image)) => vec![
                Part::text(text.unwrap_or(DEFAULT_IMAGE_INSTRUCTION)),
                Part::inline(image.mime_type, image.data),
            ],
        };

        Ok(GenerateContentRequest::new(parts)
            .with_system_instruction(SYSTEM_INSTRUCTION)
            .with_generation_config(GenerationConfig::json(self.schema.to_json())))
    }

    /// Generate a ticket design for `input`.
    ///
    /// # Errors
    ///
    /// - [`GenAiError::EmptyInput`] / [`GenAiError::InvalidImage`] for bad input
    /// - transport and API errors from the model, unchanged
    /// - [`GenAiError::NoTextResponse`] when the model returns no text
    /// - [`GenAiError::MalformedOutput`] / [`GenAiError::Schema`] when the text
    ///   is not a valid ticket document
    pub async fn generate(&self, input: &TicketInput) -> Result<TicketRecord, GenAiError> {
        let result = self.try_generate(input).await;

        match &result {
            Ok(record) => {
                tracing::info!(
                    model = %self.model_name,
                    event = %record.event_details.artist_or_event,
                    "Ticket metadata generated"
                );
                metrics::counter!("prettytickets_generations_total", "kind" => "metadata", "outcome" => "ok")
                    .increment(1);
            }
            Err(e) => {
                tracing::error!(model = %self.model_name, error = %e, "Error generating ticket metadata");
                metrics::counter!("prettytickets_generations_total", "kind" => "metadata", "outcome" => "error")
                    .increment(1);
            }
        }

        result
    }

    async fn try_generate(&self, input: &TicketInput) -> Result<TicketRecord, GenAiError> {
        let request = self.build_request(input)?;
        let response = self.model.generate_content(&self.model_name, &request).await?;
        let text = response.text().ok_or(GenAiError::NoTextResponse)?;
        self.parse_record(&text)
    }

    /// Parse and validate the model's JSON text.
    ///
    /// A tagline that repeats a brand slogan is replaced with the generic
    /// event subtitle.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::MalformedOutput`] for non-JSON text and
    /// [`GenAiError::Schema`] for JSON that breaks the schema.
    pub fn parse_record(&self, text: &str) -> Result<TicketRecord, GenAiError> {
        let document: Value =
            serde_json::from_str(text).map_err(|e| GenAiError::MalformedOutput(e.to_string()))?;
        self.schema.validate(&document)?;

        let mut record: TicketRecord = serde_json::from_value(document)
            .map_err(|e| GenAiError::MalformedOutput(e.to_string()))?;

        if record.gift_copy.replace_slogan_tagline() {
            tracing::warn!("Model used a marketing slogan as tagline; replaced");
        }

        Ok(record)
    }
}
