//! Router configuration.

use super::health::{health_check, readiness_check};
use super::request_id::request_id_layer;
use super::state::AppState;
use crate::api::{generate_image, generate_ticket, get_ticket, list_tickets, unlock_ticket};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use prettytickets_core::TicketRepository;
use prettytickets_genai::GenerativeModel;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Largest accepted request body; ticket photos arrive base64-encoded.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build the complete Axum router.
///
/// - `GET /health`, `GET /ready`
/// - `POST /api/tickets/generate`
/// - `GET /api/tickets`, `GET /api/tickets/:id`
/// - `POST /api/tickets/:id/unlock`
/// - `POST /api/images`
pub fn build_router<M, R>(state: AppState<M, R>) -> Router
where
    M: GenerativeModel + Clone + 'static,
    R: TicketRepository + 'static,
{
    let api_routes = Router::new()
        .route("/tickets", get(list_tickets::<M, R>))
        .route("/tickets/generate", post(generate_ticket::<M, R>))
        .route("/tickets/:id", get(get_ticket::<M, R>))
        .route("/tickets/:id/unlock", post(unlock_ticket::<M, R>))
        .route("/images", post(generate_image::<M, R>));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check::<M, R>))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
