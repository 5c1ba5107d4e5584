//! Persisted ticket rows and their mapping back to [`TicketRecord`]s.

use crate::ticket::{
    AiPrompts, EventDetails, GiftCopy, LayoutGuide, SessionId, TicketId, TicketRecord, UserId,
    VisualTheme,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One row of the `tickets` table.
///
/// The four design sections are kept as opaque JSON documents; they are only
/// interpreted when the row is mapped with [`StoredTicket::load`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTicket {
    /// Row id
    pub id: TicketId,
    /// Insert time
    pub created_at: DateTime<Utc>,
    /// Owning user, if any
    pub user_id: Option<UserId>,
    /// `eventDetails` document
    pub event_details: Value,
    /// `visualTheme` document
    pub visual_theme: Value,
    /// `giftCopy` document
    pub gift_copy: Value,
    /// `aiPrompts` document, including the cached background image
    pub ai_prompts: Value,
    /// Whether the ticket has been unlocked by a payment
    pub is_paid: bool,
    /// Session that unlocked the ticket
    pub stripe_session_id: Option<SessionId>,
}

impl StoredTicket {
    /// Rebuild the ticket design from the stored documents.
    ///
    /// The stored layout guidance is not read back: loaded tickets always use
    /// [`LayoutGuide::standard`].
    ///
    /// # Errors
    ///
    /// Returns [`MappingError`] naming the first document that does not
    /// deserialize.
    pub fn load(&self) -> Result<LoadedTicket, MappingError> {
        let event_details: EventDetails = decode("event_details", &self.event_details)?;
        let visual_theme: VisualTheme = decode("visual_theme", &self.visual_theme)?;
        let gift_copy: GiftCopy = decode("gift_copy", &self.gift_copy)?;
        let ai_prompts: AiPrompts = decode("ai_prompts", &self.ai_prompts)?;

        let image_url = ai_prompts.cached_image.clone().unwrap_or_default();

        Ok(LoadedTicket {
            id: self.id,
            created_at: self.created_at,
            record: TicketRecord {
                event_details,
                visual_theme,
                ai_prompts,
                gift_copy,
                layout_guide: LayoutGuide::standard(),
            },
            image_url,
            is_paid: self.is_paid,
        })
    }
}

fn decode<T: DeserializeOwned>(column: &'static str, value: &Value) -> Result<T, MappingError> {
    T::deserialize(value).map_err(|e| MappingError {
        column,
        reason: e.to_string(),
    })
}

/// A stored document that no longer matches the ticket shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("column `{column}` does not map: {reason}")]
pub struct MappingError {
    /// Offending column
    pub column: &'static str,
    /// Deserializer message
    pub reason: String,
}

/// A stored ticket mapped back into application types.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedTicket {
    /// Ticket id
    pub id: TicketId,
    /// Insert time
    pub created_at: DateTime<Utc>,
    /// Design with the standard layout
    #[serde(rename = "ticketData")]
    pub record: TicketRecord,
    /// Cached background as a data URI, `""` when none was rendered
    pub image_url: String,
    /// Unlock state
    pub is_paid: bool,
}

/// Values for a row about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    /// Owning user, if any
    pub user_id: Option<UserId>,
    /// `eventDetails` document
    pub event_details: Value,
    /// `visualTheme` document
    pub visual_theme: Value,
    /// `giftCopy` document
    pub gift_copy: Value,
    /// `aiPrompts` document with the cached image embedded
    pub ai_prompts: Value,
}

impl NewTicket {
    /// Build the row for `record`, embedding `cached_image` into `aiPrompts`.
    ///
    /// An empty `cached_image` leaves the cache slot out. The record's layout
    /// guide has no column and is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if a section fails to serialize.
    pub fn from_record(
        user_id: Option<UserId>,
        record: &TicketRecord,
        cached_image: &str,
    ) -> Result<Self, serde_json::Error> {
        let ai_prompts = AiPrompts {
            cached_image: (!cached_image.is_empty()).then(|| cached_image.to_string()),
            ..record.ai_prompts.clone()
        };

        Ok(Self {
            user_id,
            event_details: to_document(&record.event_details)?,
            visual_theme: to_document(&record.visual_theme)?,
            gift_copy: to_document(&record.gift_copy)?,
            ai_prompts: to_document(&ai_prompts)?,
        })
    }
}

fn to_document<T: Serialize>(value: &T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(value)
}
