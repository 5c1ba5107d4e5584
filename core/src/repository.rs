//! Storage seam for tickets.
//!
//! [`TicketRepository`] is the raw row-level contract a backing store must
//! meet. Application code talks to [`TicketStore`](crate::store::TicketStore),
//! which layers demo mode, mapping and the unlock transition on top.

use crate::stored::{NewTicket, StoredTicket};
use crate::ticket::{SessionId, TicketId};
use std::future::Future;

/// Errors raised by a backing store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Query or connection failure
    #[error("Database error: {0}")]
    Database(String),

    /// A document could not be serialized for storage
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Result of trying to attach a session id to a ticket row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// Row was unpaid and is now paid with the session attached
    Attached,
    /// Row was already paid; nothing changed
    AlreadyPaid,
    /// No row with that id
    NotFound,
    /// Another row holds the session id (uniqueness constraint fired)
    SessionTaken,
}

/// Row-level access to the `tickets` table.
///
/// Implementations must enforce uniqueness of `stripe_session_id` at the
/// storage layer: two concurrent [`attach_session`](Self::attach_session) calls
/// with the same session id for different tickets must not both report
/// [`AttachOutcome::Attached`].
pub trait TicketRepository: Send + Sync {
    /// Insert a new unpaid row and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the insert fails.
    fn insert(&self, ticket: NewTicket) -> impl Future<Output = Result<TicketId>> + Send;

    /// Fetch one row by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    fn fetch(&self, id: TicketId) -> impl Future<Output = Result<Option<StoredTicket>>> + Send;

    /// Fetch up to `limit` rows, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    fn recent(&self, limit: usize) -> impl Future<Output = Result<Vec<StoredTicket>>> + Send;

    /// Ids of every row whose `stripe_session_id` equals `session`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    fn ids_with_session(
        &self,
        session: &SessionId,
    ) -> impl Future<Output = Result<Vec<TicketId>>> + Send;

    /// Mark an unpaid row as paid and attach `session` to it.
    ///
    /// Paid rows are left untouched so an attached session id is never
    /// replaced.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] for failures other than the session
    /// uniqueness violation, which is reported as
    /// [`AttachOutcome::SessionTaken`].
    fn attach_session(
        &self,
        id: TicketId,
        session: &SessionId,
    ) -> impl Future<Output = Result<AttachOutcome>> + Send;
}
