//! Application state for the HTTP server.

use crate::studio::TicketStudio;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply via `Arc`) for each request.
pub struct AppState<M, R> {
    /// Generators and ticket store
    pub studio: Arc<TicketStudio<M, R>>,
}

impl<M, R> AppState<M, R> {
    /// Create a new application state.
    #[must_use]
    pub fn new(studio: TicketStudio<M, R>) -> Self {
        Self {
            studio: Arc::new(studio),
        }
    }
}

impl<M, R> Clone for AppState<M, R> {
    fn clone(&self) -> Self {
        Self {
            studio: Arc::clone(&self.studio),
        }
    }
}
