//! # PrettyTickets Core
//!
//! Data model and storage contract for PrettyTickets, the service that turns
//! plain event tickets into collectible, gift-ready designs.
//!
//! This crate provides:
//! - [`ticket`]: the [`TicketRecord`] design produced by the generative model
//! - [`schema`]: the structured-output contract, described as data
//! - [`stored`]: persisted rows and their mapping back to records
//! - [`repository`]: the [`TicketRepository`] seam backing stores implement
//! - [`store`]: the [`TicketStore`] facade, including the one-time payment
//!   unlock
//!
//! ## Example
//!
//! ```ignore
//! use prettytickets_core::{SessionId, TicketStore};
//!
//! let store = TicketStore::connected(repository);
//! let saved = store.save(&record, &background).await?;
//!
//! if let Some(id) = saved.id() {
//!     let outcome = store.mark_paid(id, &SessionId::new("cs_test_123")).await;
//!     assert!(outcome.is_success());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod repository;
pub mod schema;
pub mod store;
pub mod stored;
pub mod ticket;

pub use repository::{AttachOutcome, StoreError, TicketRepository};
pub use schema::{SchemaNode, SchemaViolation, ticket_record_schema};
pub use store::{DEFAULT_RECENT_LIMIT, SaveOutcome, TicketStore, UnlockOutcome};
pub use stored::{LoadedTicket, MappingError, NewTicket, StoredTicket};
pub use ticket::{
    AiPrompts, EventDetails, FontWeights, GiftCopy, LayoutGuide, SessionId, TicketId,
    TicketRecord, Typography, UserId, VisualTheme,
};

/// Environment traits injected into stores and services.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }
}
