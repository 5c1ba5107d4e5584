//! Health check endpoints.

use super::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use prettytickets_core::TicketRepository;
use prettytickets_genai::GenerativeModel;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Liveness check. Returns 200 OK while the process is serving.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"ok","version":"0.1.0"}
/// ```
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    /// Whether the service can accept traffic
    pub ready: bool,
    /// A generative model is configured
    pub ai: bool,
    /// A database is configured (`false` means demo mode)
    pub store: bool,
}

/// Readiness check.
///
/// The service always accepts traffic; the flags tell operators which
/// features are degraded.
///
/// ```bash
/// curl http://localhost:8080/ready
/// # {"ready":true,"ai":true,"store":false}
/// ```
pub async fn readiness_check<M, R>(
    State(state): State<AppState<M, R>>,
) -> (StatusCode, Json<ReadinessResponse>)
where
    M: GenerativeModel + Clone,
    R: TicketRepository,
{
    (
        StatusCode::OK,
        Json(ReadinessResponse {
            ready: true,
            ai: state.studio.is_ai_configured(),
            store: state.studio.store().is_configured(),
        }),
    )
}
