//! In-memory ticket repository.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)]

use crate::mocks::stepping_clock;
use prettytickets_core::environment::Clock;
use prettytickets_core::repository::{AttachOutcome, Result, StoreError, TicketRepository};
use prettytickets_core::{NewTicket, SessionId, StoredTicket, TicketId};
use serde_json::Value;
use std::sync::{Arc, RwLock};

/// In-memory [`TicketRepository`] for fast, deterministic tests.
///
/// Mirrors the database rules: session ids are unique across rows, paid rows
/// are never re-keyed, and `created_at` comes from an injected clock (a
/// one-second [`SteppingClock`](crate::SteppingClock) by default).
///
/// Clones share the same rows.
///
/// # Example
///
/// ```
/// use prettytickets_testing::InMemoryTicketRepository;
///
/// let repository = InMemoryTicketRepository::new();
/// assert!(repository.is_empty());
/// ```
#[derive(Clone)]
pub struct InMemoryTicketRepository {
    rows: Arc<RwLock<Vec<StoredTicket>>>,
    failure: Arc<RwLock<Option<StoreError>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTicketRepository {
    /// Create a new empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(stepping_clock())
    }

    /// Create a repository stamping rows with `clock`
    #[must_use]
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
            failure: Arc::new(RwLock::new(None)),
            clock: Arc::new(clock),
        }
    }

    /// Make every subsequent call fail with `error` (`None` to recover).
    pub fn fail_with(&self, error: Option<StoreError>) {
        *self.failure.write().unwrap() = error;
    }

    /// Insert a row exactly as given, bypassing [`NewTicket`].
    pub fn insert_raw(&self, row: StoredTicket) {
        self.rows.write().unwrap().push(row);
    }

    /// Corrupt a row's `eventDetails` so it no longer maps.
    pub fn poison(&self, id: TicketId) {
        if let Some(row) = self.rows.write().unwrap().iter_mut().find(|r| r.id == id) {
            row.event_details = Value::String("corrupted".to_string());
        }
    }

    /// Snapshot of one row
    #[must_use]
    pub fn row(&self, id: TicketId) -> Option<StoredTicket> {
        self.rows.read().unwrap().iter().find(|r| r.id == id).cloned()
    }

    /// Number of stored rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    /// Whether no rows are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().unwrap().is_empty()
    }

    fn check(&self) -> Result<()> {
        self.failure.read().unwrap().clone().map_or(Ok(()), Err)
    }
}

impl Default for InMemoryTicketRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryTicketRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTicketRepository")
            .field("rows", &self.len())
            .finish_non_exhaustive()
    }
}

impl TicketRepository for InMemoryTicketRepository {
    async fn insert(&self, ticket: NewTicket) -> Result<TicketId> {
        self.check()?;
        let id = TicketId::new();
        self.rows.write().unwrap().push(StoredTicket {
            id,
            created_at: self.clock.now(),
            user_id: ticket.user_id,
            event_details: ticket.event_details,
            visual_theme: ticket.visual_theme,
            gift_copy: ticket.gift_copy,
            ai_prompts: ticket.ai_prompts,
            is_paid: false,
            stripe_session_id: None,
        });
        Ok(id)
    }

    async fn fetch(&self, id: TicketId) -> Result<Option<StoredTicket>> {
        self.check()?;
        Ok(self.row(id))
    }

    async fn recent(&self, limit: usize) -> Result<Vec<StoredTicket>> {
        self.check()?;
        let mut rows = self.rows.read().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn ids_with_session(&self, session: &SessionId) -> Result<Vec<TicketId>> {
        self.check()?;
        Ok(self
            .rows
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.stripe_session_id.as_ref() == Some(session))
            .map(|r| r.id)
            .collect())
    }

    async fn attach_session(&self, id: TicketId, session: &SessionId) -> Result<AttachOutcome> {
        self.check()?;
        let mut rows = self.rows.write().unwrap();

        if rows
            .iter()
            .any(|r| r.id != id && r.stripe_session_id.as_ref() == Some(session))
        {
            return Ok(AttachOutcome::SessionTaken);
        }

        let Some(row) = rows.iter_mut().find(|r| r.id == id) else {
            return Ok(AttachOutcome::NotFound);
        };
        if row.is_paid {
            return Ok(AttachOutcome::AlreadyPaid);
        }

        row.is_paid = true;
        row.stripe_session_id = Some(session.clone());
        Ok(AttachOutcome::Attached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_ticket() -> NewTicket {
        NewTicket {
            user_id: None,
            event_details: json!({ "artistOrEvent": "Muse", "venue": "Wembley", "date": "2025-06-01" }),
            visual_theme: json!({}),
            gift_copy: json!({}),
            ai_prompts: json!({}),
        }
    }

    #[tokio::test]
    async fn test_session_is_unique_across_rows() {
        let repository = InMemoryTicketRepository::new();
        let a = repository.insert(new_ticket()).await.unwrap();
        let b = repository.insert(new_ticket()).await.unwrap();
        let session = SessionId::new("cs_1");

        assert_eq!(
            repository.attach_session(a, &session).await.unwrap(),
            AttachOutcome::Attached
        );
        assert_eq!(
            repository.attach_session(b, &session).await.unwrap(),
            AttachOutcome::SessionTaken
        );
        assert!(!repository.row(b).unwrap().is_paid);
    }

    #[tokio::test]
    async fn test_recent_orders_by_created_at() {
        let repository = InMemoryTicketRepository::new();
        let first = repository.insert(new_ticket()).await.unwrap();
        let second = repository.insert(new_ticket()).await.unwrap();

        let rows = repository.recent(10).await.unwrap();
        assert_eq!(rows[0].id, second);
        assert_eq!(rows[1].id, first);
        assert!(rows[0].created_at > rows[1].created_at);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let repository = InMemoryTicketRepository::new();
        repository.fail_with(Some(StoreError::Database("down".to_string())));

        assert!(repository.recent(1).await.is_err());

        repository.fail_with(None);
        assert!(repository.recent(1).await.is_ok());
    }
}
