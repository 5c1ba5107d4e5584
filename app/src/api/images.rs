//! Background image endpoint.
//!
//! - POST /api/images - Render a background for a scene description

use crate::server::error::AppError;
use crate::server::state::AppState;
use axum::{Json, extract::State};
use prettytickets_core::TicketRepository;
use prettytickets_genai::GenerativeModel;
use serde::{Deserialize, Serialize};

/// Request to render a background.
#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    /// Scene description; composition directives are appended server-side
    pub prompt: String,
}

/// Rendered background.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    /// Image as a data URI, `""` when the model produced none
    pub image_url: String,
}

/// Render a background image.
///
/// A refused or failed render answers 200 with an empty `imageUrl`.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/images \
///   -H "Content-Type: application/json" \
///   -d '{"prompt": "A glittering stadium under a lavender aurora"}'
/// ```
pub async fn generate_image<M, R>(
    State(state): State<AppState<M, R>>,
    Json(request): Json<GenerateImageRequest>,
) -> Result<Json<GenerateImageResponse>, AppError>
where
    M: GenerativeModel + Clone + 'static,
    R: TicketRepository + 'static,
{
    let outcome = state.studio.generate_background(&request.prompt).await?;

    Ok(Json(GenerateImageResponse {
        image_url: outcome.into_data_uri(),
    }))
}
