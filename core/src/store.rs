//! Ticket persistence and the payment-unlock transition.
//!
//! # Unlock transition
//!
//! A ticket starts `Unpaid` (`is_paid = false`, no session) and becomes `Paid`
//! exactly once, through [`TicketStore::mark_paid`]:
//!
//! 1. Look up every ticket already holding the session id.
//! 2. If one exists and it is the target ticket, the call is a replay and
//!    succeeds without writing. If it is another ticket, the payment has
//!    already been used and the call fails.
//! 3. Otherwise attach the session to the target and mark it paid.
//!
//! Step 1 only produces the friendly message on the common path. Two racing
//! calls can both pass it; the repository's uniqueness constraint on the
//! session id decides the winner in step 3 and the loser reports the same
//! "already used" failure.
//!
//! A paid ticket keeps the session it was unlocked with. Presenting a
//! different session for it reports [`UnlockOutcome::AlreadyPaid`] without
//! attaching that session, so the other session stays unconsumed and can
//! still unlock another ticket.
//!
//! # Demo mode
//!
//! Without a backing store ([`TicketStore::demo`]) every operation is a no-op
//! returning its "nothing here" value: saves report
//! [`SaveOutcome::NotConfigured`], reads return nothing and unlocks fail with
//! [`UnlockOutcome::NotConfigured`].

use crate::repository::{AttachOutcome, StoreError, TicketRepository};
use crate::stored::{LoadedTicket, NewTicket};
use crate::ticket::{SessionId, TicketId, TicketRecord, UserId};

/// Number of tickets returned by [`TicketStore::list_recent`] callers that
/// don't pick a limit.
pub const DEFAULT_RECENT_LIMIT: usize = 12;

/// Result of saving a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Row inserted
    Saved(TicketId),
    /// No backing store; nothing was written
    NotConfigured,
}

impl SaveOutcome {
    /// The new ticket id, if one was written.
    #[must_use]
    pub const fn id(&self) -> Option<TicketId> {
        match self {
            Self::Saved(id) => Some(*id),
            Self::NotConfigured => None,
        }
    }
}

/// Result of an unlock attempt.
///
/// Failures are values, not errors: callers branch on
/// [`is_success`](Self::is_success) and show [`message`](Self::message).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    /// Ticket moved from unpaid to paid with this session
    Unlocked,
    /// Same session presented again for the same ticket
    Replayed,
    /// Ticket was already paid through another session; left unchanged
    AlreadyPaid,
    /// Session already unlocked a different ticket
    SessionAlreadyUsed,
    /// No ticket with the given id
    TicketNotFound,
    /// No backing store configured
    NotConfigured,
    /// Store failed while verifying
    VerificationFailed,
}

impl UnlockOutcome {
    /// Whether the ticket is unlocked after this call.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Unlocked | Self::Replayed | Self::AlreadyPaid)
    }

    /// User-facing explanation for failures.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::Unlocked | Self::Replayed | Self::AlreadyPaid => None,
            Self::SessionAlreadyUsed => Some("This payment has already been used."),
            Self::TicketNotFound => Some("Ticket not found."),
            Self::NotConfigured => Some("Database not connected"),
            Self::VerificationFailed => Some("Verification failed. Please contact support."),
        }
    }

    /// Stable label for logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unlocked => "unlocked",
            Self::Replayed => "replayed",
            Self::AlreadyPaid => "already_paid",
            Self::SessionAlreadyUsed => "session_already_used",
            Self::TicketNotFound => "ticket_not_found",
            Self::NotConfigured => "not_configured",
            Self::VerificationFailed => "verification_failed",
        }
    }
}

/// Ticket persistence over an optional [`TicketRepository`].
#[derive(Debug, Clone)]
pub struct TicketStore<R> {
    repository: Option<R>,
}

impl<R: TicketRepository> TicketStore<R> {
    /// Store backed by `repository`.
    #[must_use]
    pub const fn connected(repository: R) -> Self {
        Self {
            repository: Some(repository),
        }
    }

    /// Store with no backing repository.
    #[must_use]
    pub const fn demo() -> Self {
        Self { repository: None }
    }

    /// Whether a backing repository is present.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.repository.is_some()
    }

    /// Save an unowned ticket with its rendered background.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the insert fails.
    pub async fn save(
        &self,
        record: &TicketRecord,
        cached_image: &str,
    ) -> Result<SaveOutcome, StoreError> {
        self.save_owned(None, record, cached_image).await
    }

    /// Save a ticket for `owner`. The row starts unpaid.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the insert fails.
    pub async fn save_owned(
        &self,
        owner: Option<UserId>,
        record: &TicketRecord,
        cached_image: &str,
    ) -> Result<SaveOutcome, StoreError> {
        let Some(repository) = &self.repository else {
            tracing::warn!("Skipping ticket save: no database configured");
            return Ok(SaveOutcome::NotConfigured);
        };

        let row = NewTicket::from_record(owner, record, cached_image)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let id = repository.insert(row).await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to save ticket");
        })?;

        tracing::info!(ticket_id = %id, has_image = !cached_image.is_empty(), "Ticket saved");
        metrics::counter!("prettytickets_tickets_saved_total").increment(1);

        Ok(SaveOutcome::Saved(id))
    }

    /// Load one ticket.
    ///
    /// Missing rows and rows whose documents no longer map both yield
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query itself fails.
    pub async fn get(&self, id: TicketId) -> Result<Option<LoadedTicket>, StoreError> {
        let Some(repository) = &self.repository else {
            return Ok(None);
        };

        let Some(row) = repository.fetch(id).await? else {
            return Ok(None);
        };

        match row.load() {
            Ok(ticket) => Ok(Some(ticket)),
            Err(e) => {
                tracing::warn!(ticket_id = %id, error = %e, "Stored ticket does not map");
                Ok(None)
            }
        }
    }

    /// Load up to `limit` tickets, newest first, skipping rows that don't map.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query itself fails.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<LoadedTicket>, StoreError> {
        let Some(repository) = &self.repository else {
            return Ok(Vec::new());
        };

        let rows = repository.recent(limit).await?;
        let tickets = rows
            .iter()
            .filter_map(|row| {
                row.load()
                    .inspect_err(|e| {
                        tracing::warn!(ticket_id = %row.id, error = %e, "Skipping unmappable ticket");
                    })
                    .ok()
            })
            .take(limit)
            .collect();

        Ok(tickets)
    }

    /// Unlock `id` with the payment `session`. See the module docs.
    pub async fn mark_paid(&self, id: TicketId, session: &SessionId) -> UnlockOutcome {
        let outcome = match &self.repository {
            None => UnlockOutcome::NotConfigured,
            Some(repository) => match Self::unlock(repository, id, session).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(ticket_id = %id, error = %e, "Payment verification failed");
                    UnlockOutcome::VerificationFailed
                }
            },
        };

        if outcome.is_success() {
            tracing::info!(ticket_id = %id, outcome = outcome.as_str(), "Ticket unlock");
        } else {
            tracing::warn!(ticket_id = %id, outcome = outcome.as_str(), "Ticket unlock refused");
        }
        metrics::counter!("prettytickets_unlocks_total", "outcome" => outcome.as_str())
            .increment(1);

        outcome
    }

    async fn unlock(
        repository: &R,
        id: TicketId,
        session: &SessionId,
    ) -> Result<UnlockOutcome, StoreError> {
        let holders = repository.ids_with_session(session).await?;
        if !holders.is_empty() {
            return Ok(if holders.contains(&id) {
                UnlockOutcome::Replayed
            } else {
                UnlockOutcome::SessionAlreadyUsed
            });
        }

        Ok(match repository.attach_session(id, session).await? {
            AttachOutcome::Attached => UnlockOutcome::Unlocked,
            AttachOutcome::AlreadyPaid => UnlockOutcome::AlreadyPaid,
            AttachOutcome::NotFound => UnlockOutcome::TicketNotFound,
            AttachOutcome::SessionTaken => UnlockOutcome::SessionAlreadyUsed,
        })
    }
}
