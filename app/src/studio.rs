//! The composition root: generators plus the ticket store.
//!
//! [`TicketStudio`] is what the HTTP layer talks to. It owns the optional
//! generators (absent when no API key is configured) and the
//! [`TicketStore`] (in demo mode when no database is configured).

use prettytickets_core::{SaveOutcome, TicketId, TicketRecord, TicketRepository, TicketStore};
use prettytickets_genai::{
    GenAiError, GenerativeModel, ImageGenerator, ImageOutcome, MetadataGenerator, TicketInput,
};

/// A freshly designed ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTicket {
    /// Id of the saved row; `None` in demo mode or when the save failed
    pub id: Option<TicketId>,
    /// The generated design
    pub record: TicketRecord,
    /// What happened when rendering the background
    pub image: ImageOutcome,
}

struct Generators<M> {
    metadata: MetadataGenerator<M>,
    image: ImageGenerator<M>,
}

/// Generators and storage behind the HTTP API.
pub struct TicketStudio<M, R> {
    generators: Option<Generators<M>>,
    store: TicketStore<R>,
}

impl<M, R> TicketStudio<M, R>
where
    M: GenerativeModel + Clone,
    R: TicketRepository,
{
    /// Studio whose generators share `model`, using the given model names.
    #[must_use]
    pub fn new(
        model: M,
        text_model: impl Into<String>,
        image_model: impl Into<String>,
        store: TicketStore<R>,
    ) -> Self {
        Self::with_generators(
            MetadataGenerator::new(model.clone()).with_model_name(text_model),
            ImageGenerator::new(model).with_model_name(image_model),
            store,
        )
    }

    /// Studio with explicitly built generators.
    #[must_use]
    pub const fn with_generators(
        metadata: MetadataGenerator<M>,
        image: ImageGenerator<M>,
        store: TicketStore<R>,
    ) -> Self {
        Self {
            generators: Some(Generators { metadata, image }),
            store,
        }
    }

    /// Studio with no generative model configured.
    #[must_use]
    pub const fn without_ai(store: TicketStore<R>) -> Self {
        Self {
            generators: None,
            store,
        }
    }

    /// Whether a generative model is configured.
    #[must_use]
    pub const fn is_ai_configured(&self) -> bool {
        self.generators.is_some()
    }

    /// The ticket store.
    #[must_use]
    pub const fn store(&self) -> &TicketStore<R> {
        &self.store
    }

    fn generators(&self) -> Result<&Generators<M>, GenAiError> {
        self.generators.as_ref().ok_or(GenAiError::MissingApiKey)
    }

    /// Turn ticket text and/or image into a ticket design.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::MissingApiKey`] when no model is configured,
    /// otherwise whatever the metadata generator reports.
    pub async fn generate_metadata(&self, input: &TicketInput) -> Result<TicketRecord, GenAiError> {
        self.generators()?.metadata.generate(input).await
    }

    /// Render a background for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::MissingApiKey`] when no model is configured.
    /// Generation failures are not errors; they yield an outcome without an
    /// image.
    pub async fn generate_background(&self, prompt: &str) -> Result<ImageOutcome, GenAiError> {
        Ok(self.generators()?.image.generate(prompt).await)
    }

    /// Generate metadata, optionally render its background, then save.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError`] if metadata generation fails. A failed
    /// background is not an error; the ticket is saved without one. A failed
    /// save is not an error either: it is logged and counted, and the design
    /// comes back without an id.
    pub async fn create_ticket(
        &self,
        input: &TicketInput,
        render_background: bool,
    ) -> Result<CreatedTicket, GenAiError> {
        let generators = self.generators()?;
        let record = generators.metadata.generate(input).await?;

        let image = if render_background {
            generators.image.generate(record.background_prompt()).await
        } else {
            ImageOutcome::NotAttempted
        };

        let id = match self.store.save(&record, image.data_uri()).await {
            Ok(SaveOutcome::Saved(id)) => Some(id),
            Ok(SaveOutcome::NotConfigured) => None,
            Err(e) => {
                tracing::error!(error = %e, "Ticket generated but could not be saved");
                metrics::counter!("prettytickets_ticket_save_failures_total").increment(1);
                None
            }
        };

        Ok(CreatedTicket { id, record, image })
    }
}

impl<M, R: TicketRepository> std::fmt::Debug for TicketStudio<M, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketStudio")
            .field("ai_configured", &self.generators.is_some())
            .field("store_configured", &self.store.is_configured())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use prettytickets_core::StoreError;
    use prettytickets_testing::fixtures::{SAMPLE_TICKET_TEXT, sample_document, sample_record};
    use prettytickets_testing::{InMemoryTicketRepository, ScriptedModel};

    type TestStudio = TicketStudio<ScriptedModel, InMemoryTicketRepository>;

    fn studio(model: &ScriptedModel) -> (InMemoryTicketRepository, TestStudio) {
        let repository = InMemoryTicketRepository::new();
        let studio = TicketStudio::new(
            model.clone(),
            "text-model",
            "image-model",
            TicketStore::connected(repository.clone()),
        );
        (repository, studio)
    }

    #[tokio::test]
    async fn test_create_ticket_saves_record_with_background() {
        let model = ScriptedModel::new();
        model
            .push_json(&sample_document())
            .push_image("image/webp", "UklGRg==");
        let (repository, studio) = studio(&model);

        let created = studio
            .create_ticket(&TicketInput::text(SAMPLE_TICKET_TEXT), true)
            .await
            .unwrap();

        assert_eq!(created.record, sample_record());
        assert_eq!(created.image.data_uri(), "data:image/webp;base64,UklGRg==");
        let ticket = studio.store().get(created.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(ticket.image_url, "data:image/webp;base64,UklGRg==");
        assert_eq!(repository.len(), 1);

        let models: Vec<String> = model.requests().into_iter().map(|(name, _)| name).collect();
        assert_eq!(models, vec!["text-model", "image-model"]);
    }

    #[tokio::test]
    async fn test_create_ticket_without_background() {
        let model = ScriptedModel::new();
        model.push_json(&sample_document());
        let (_, studio) = studio(&model);

        let created = studio
            .create_ticket(&TicketInput::text(SAMPLE_TICKET_TEXT), false)
            .await
            .unwrap();

        assert_eq!(created.image, ImageOutcome::NotAttempted);
        assert_eq!(model.request_count(), 1);
        let ticket = studio.store().get(created.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(ticket.image_url, "");
    }

    #[tokio::test]
    async fn test_declined_background_still_saves() {
        let model = ScriptedModel::new();
        model
            .push_json(&sample_document())
            .push_refusal("I can't depict that.");
        let (repository, studio) = studio(&model);

        let created = studio
            .create_ticket(&TicketInput::text(SAMPLE_TICKET_TEXT), true)
            .await
            .unwrap();

        assert!(matches!(created.image, ImageOutcome::Declined { .. }));
        assert!(created.id.is_some());
        assert_eq!(repository.len(), 1);
    }

    #[tokio::test]
    async fn test_metadata_failure_saves_nothing() {
        let model = ScriptedModel::new();
        model.push_text("not json");
        let (repository, studio) = studio(&model);

        let err = studio
            .create_ticket(&TicketInput::text(SAMPLE_TICKET_TEXT), true)
            .await
            .unwrap_err();

        assert!(matches!(err, GenAiError::MalformedOutput(_)));
        assert!(repository.is_empty());
        assert_eq!(model.request_count(), 1);
    }

    #[tokio::test]
    async fn test_store_outage_keeps_generated_design() {
        let model = ScriptedModel::new();
        model
            .push_json(&sample_document())
            .push_image("image/png", "iVBORw0KGgo=");
        let (repository, studio) = studio(&model);
        repository.fail_with(Some(StoreError::Database("connection refused".to_string())));

        let created = studio
            .create_ticket(&TicketInput::text(SAMPLE_TICKET_TEXT), true)
            .await
            .unwrap();

        assert_eq!(created.id, None);
        assert_eq!(created.record, sample_record());
        assert_eq!(created.image.data_uri(), "data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(model.request_count(), 2);

        repository.fail_with(None);
        assert!(repository.is_empty());
    }

    #[tokio::test]
    async fn test_demo_store_returns_no_id() {
        let model = ScriptedModel::new();
        model.push_json(&sample_document());
        let studio: TestStudio = TicketStudio::new(model, "t", "i", TicketStore::demo());

        let created = studio
            .create_ticket(&TicketInput::text(SAMPLE_TICKET_TEXT), false)
            .await
            .unwrap();

        assert_eq!(created.id, None);
    }

    #[tokio::test]
    async fn test_without_ai_reports_missing_key() {
        let studio: TestStudio = TicketStudio::without_ai(TicketStore::demo());

        assert!(!studio.is_ai_configured());
        assert!(matches!(
            studio.generate_metadata(&TicketInput::text("x")).await,
            Err(GenAiError::MissingApiKey)
        ));
        assert!(matches!(
            studio.generate_background("x").await,
            Err(GenAiError::MissingApiKey)
        ));
        assert!(matches!(
            studio.create_ticket(&TicketInput::text("x"), true).await,
            Err(GenAiError::MissingApiKey)
        ));
    }
}
