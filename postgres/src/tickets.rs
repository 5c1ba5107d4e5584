//! `PostgreSQL` ticket repository.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE tickets (
//!     id                UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     created_at        TIMESTAMPTZ NOT NULL DEFAULT now(),
//!     user_id           UUID,
//!     event_details     JSONB,
//!     visual_theme      JSONB,
//!     gift_copy         JSONB,
//!     ai_prompts        JSONB,
//!     is_paid           BOOLEAN NOT NULL DEFAULT FALSE,
//!     stripe_session_id TEXT UNIQUE
//! );
//! ```

use crate::pool::PoolSettings;
use chrono::{DateTime, Utc};
use prettytickets_core::repository::{AttachOutcome, Result, StoreError, TicketRepository};
use prettytickets_core::{NewTicket, SessionId, StoredTicket, TicketId, UserId};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

const SELECT_COLUMNS: &str = "id, created_at, user_id, event_details, visual_theme, gift_copy, \
                              ai_prompts, is_paid, stripe_session_id";

/// `PostgreSQL`-backed [`TicketRepository`].
#[derive(Clone)]
pub struct PostgresTicketRepository {
    pool: PgPool,
}

impl PostgresTicketRepository {
    /// Create a repository over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool with `settings` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the connection fails.
    pub async fn connect(settings: &PoolSettings) -> Result<Self> {
        let pool = settings
            .connect()
            .await
            .map_err(|e| StoreError::Database(format!("Failed to connect: {e}")))?;

        tracing::info!(
            max_connections = settings.max_connections,
            "Connected to ticket database"
        );
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if migrations fail.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Migration failed: {e}")))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip a trivial query.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the database is unreachable.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Ping failed: {e}")))?;
        Ok(())
    }
}

impl std::fmt::Debug for PostgresTicketRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresTicketRepository")
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

#[derive(sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    user_id: Option<Uuid>,
    event_details: Option<Value>,
    visual_theme: Option<Value>,
    gift_copy: Option<Value>,
    ai_prompts: Option<Value>,
    is_paid: bool,
    stripe_session_id: Option<String>,
}

impl From<TicketRow> for StoredTicket {
    fn from(row: TicketRow) -> Self {
        Self {
            id: TicketId::from_uuid(row.id),
            created_at: row.created_at,
            user_id: row.user_id.map(UserId),
            event_details: row.event_details.unwrap_or_default(),
            visual_theme: row.visual_theme.unwrap_or_default(),
            gift_copy: row.gift_copy.unwrap_or_default(),
            ai_prompts: row.ai_prompts.unwrap_or_default(),
            is_paid: row.is_paid,
            stripe_session_id: row.stripe_session_id.map(SessionId::new),
        }
    }
}

impl TicketRepository for PostgresTicketRepository {
    async fn insert(&self, ticket: NewTicket) -> Result<TicketId> {
        let (id,): (Uuid,) = sqlx::query_as(
            r"
            INSERT INTO tickets (user_id, event_details, visual_theme, gift_copy, ai_prompts)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(ticket.user_id.map(|u| u.0))
        .bind(&ticket.event_details)
        .bind(&ticket.visual_theme)
        .bind(&ticket.gift_copy)
        .bind(&ticket.ai_prompts)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to insert ticket: {e}")))?;

        Ok(TicketId::from_uuid(id))
    }

    async fn fetch(&self, id: TicketId) -> Result<Option<StoredTicket>> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM tickets WHERE id = $1");

        let row: Option<TicketRow> = sqlx::query_as(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to fetch ticket: {e}")))?;

        Ok(row.map(StoredTicket::from))
    }

    async fn recent(&self, limit: usize) -> Result<Vec<StoredTicket>> {
        let query = format!(
            "SELECT {SELECT_COLUMNS} FROM tickets ORDER BY created_at DESC, id DESC LIMIT $1"
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows: Vec<TicketRow> = sqlx::query_as(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to list tickets: {e}")))?;

        Ok(rows.into_iter().map(StoredTicket::from).collect())
    }

    async fn ids_with_session(&self, session: &SessionId) -> Result<Vec<TicketId>> {
        let rows: Vec<(Uuid,)> =
            sqlx::query_as("SELECT id FROM tickets WHERE stripe_session_id = $1")
                .bind(session.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StoreError::Database(format!("Failed to look up session: {e}")))?;

        Ok(rows.into_iter().map(|(id,)| TicketId::from_uuid(id)).collect())
    }

    async fn attach_session(&self, id: TicketId, session: &SessionId) -> Result<AttachOutcome> {
        let result = sqlx::query(
            r"
            UPDATE tickets
            SET is_paid = TRUE, stripe_session_id = $2
            WHERE id = $1 AND is_paid = FALSE
            ",
        )
        .bind(id.as_uuid())
        .bind(session.as_str())
        .execute(&self.pool)
        .await;

        let result = match result {
            Ok(result) => result,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tracing::warn!(ticket_id = %id, "Session id claimed by a concurrent unlock");
                return Ok(AttachOutcome::SessionTaken);
            }
            Err(e) => {
                return Err(StoreError::Database(format!("Failed to unlock ticket: {e}")));
            }
        };

        if result.rows_affected() > 0 {
            return Ok(AttachOutcome::Attached);
        }

        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM tickets WHERE id = $1)")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to check ticket: {e}")))?;

        Ok(if exists {
            AttachOutcome::AlreadyPaid
        } else {
            AttachOutcome::NotFound
        })
    }
}
