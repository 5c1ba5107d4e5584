//! Ticket API endpoints.
//!
//! - POST /api/tickets/generate - Design a ticket from text and/or an image
//! - GET /api/tickets - Recent tickets, newest first
//! - GET /api/tickets/:id - One ticket
//! - POST /api/tickets/:id/unlock - Unlock a ticket with a payment session

use crate::server::error::AppError;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use prettytickets_core::{
    DEFAULT_RECENT_LIMIT, LoadedTicket, SessionId, TicketId, TicketRecord, TicketRepository,
    UnlockOutcome,
};
use prettytickets_genai::{GenerativeModel, TicketInput};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound for `limit` on the list endpoint.
pub const MAX_LIST_LIMIT: usize = 100;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to design a ticket.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTicketRequest {
    /// Free-form ticket text
    pub text: Option<String>,
    /// Ticket photo as base64, with or without a data-URI prefix
    pub image: Option<String>,
    /// Also render a background image (default: true)
    #[serde(default = "default_render_background")]
    pub render_background: bool,
}

const fn default_render_background() -> bool {
    true
}

/// A designed ticket.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTicketResponse {
    /// Saved ticket id; `null` when no database is configured or the save failed
    pub id: Option<TicketId>,
    /// The generated design
    pub ticket_data: TicketRecord,
    /// Background as a data URI, `""` when none was produced
    pub image_url: String,
}

/// Query parameters for listing tickets.
#[derive(Debug, Deserialize)]
pub struct ListTicketsQuery {
    /// Maximum tickets to return (default: 12, max: 100)
    #[serde(default = "default_limit")]
    pub limit: usize,
}

const fn default_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

/// Request to unlock a ticket.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockRequest {
    /// Checkout session id from the payment provider
    pub session_id: String,
}

/// Result of an unlock attempt.
#[derive(Debug, Serialize)]
pub struct UnlockResponse {
    /// Whether the ticket is unlocked
    pub success: bool,
    /// Why the unlock failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Design a ticket, render its background and save it.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/tickets/generate \
///   -H "Content-Type: application/json" \
///   -d '{"text": "Taylor Swift, MetLife Stadium, 08/15/2025, Sec 12 Row A"}'
/// ```
pub async fn generate_ticket<M, R>(
    State(state): State<AppState<M, R>>,
    Json(request): Json<GenerateTicketRequest>,
) -> Result<(StatusCode, Json<GenerateTicketResponse>), AppError>
where
    M: GenerativeModel + Clone + 'static,
    R: TicketRepository + 'static,
{
    let input = TicketInput {
        text: request.text,
        image: request.image,
    };

    let created = state
        .studio
        .create_ticket(&input, request.render_background)
        .await?;

    let status = if created.id.is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(GenerateTicketResponse {
            id: created.id,
            ticket_data: created.record,
            image_url: created.image.into_data_uri(),
        }),
    ))
}

/// List recent tickets, newest first.
///
/// `limit` is clamped to `1..=100`.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/api/tickets?limit=12
/// ```
pub async fn list_tickets<M, R>(
    State(state): State<AppState<M, R>>,
    Query(query): Query<ListTicketsQuery>,
) -> Result<Json<Vec<LoadedTicket>>, AppError>
where
    M: GenerativeModel + Clone + 'static,
    R: TicketRepository + 'static,
{
    let limit = query.limit.clamp(1, MAX_LIST_LIMIT);
    let tickets = state.studio.store().list_recent(limit).await?;

    Ok(Json(tickets))
}

/// Get one ticket.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/api/tickets/550e8400-e29b-41d4-a716-446655440000
/// ```
pub async fn get_ticket<M, R>(
    State(state): State<AppState<M, R>>,
    Path(id): Path<String>,
) -> Result<Json<LoadedTicket>, AppError>
where
    M: GenerativeModel + Clone + 'static,
    R: TicketRepository + 'static,
{
    let Some(ticket_id) = parse_ticket_id(&id) else {
        return Err(AppError::not_found("Ticket", id));
    };

    state
        .studio
        .store()
        .get(ticket_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Ticket", ticket_id))
}

/// Unlock a ticket with a checkout session id.
///
/// Refusals are reported in the body with `success: false`, not as HTTP
/// errors.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/tickets/550e8400-e29b-41d4-a716-446655440000/unlock \
///   -H "Content-Type: application/json" \
///   -d '{"sessionId": "cs_test_123"}'
/// ```
pub async fn unlock_ticket<M, R>(
    State(state): State<AppState<M, R>>,
    Path(id): Path<String>,
    Json(request): Json<UnlockRequest>,
) -> Result<Json<UnlockResponse>, AppError>
where
    M: GenerativeModel + Clone + 'static,
    R: TicketRepository + 'static,
{
    let session_id = request.session_id.trim();
    if session_id.is_empty() {
        return Err(AppError::validation("sessionId is required"));
    }

    let outcome = match parse_ticket_id(&id) {
        Some(ticket_id) => {
            state
                .studio
                .store()
                .mark_paid(ticket_id, &SessionId::new(session_id))
                .await
        }
        None => UnlockOutcome::TicketNotFound,
    };

    Ok(Json(UnlockResponse {
        success: outcome.is_success(),
        message: outcome.message().map(str::to_string),
    }))
}

fn parse_ticket_id(id: &str) -> Option<TicketId> {
    Uuid::parse_str(id.trim()).ok().map(TicketId::from_uuid)
}
