//! HTTP server for PrettyTickets.
//!
//! Routing, shared state, error responses, health checks and request-id
//! middleware.

pub mod error;
pub mod health;
pub mod request_id;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_layer};
pub use routes::build_router;
pub use state::AppState;
