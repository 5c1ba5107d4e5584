//! The structured ticket design produced by the generative model.
//!
//! Field names serialize in camelCase because the same shape is used for the
//! model's structured output, the HTTP API and the stored JSON documents.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Marketing lines that belong to the PrettyTickets brand, never on a ticket.
pub const MARKETING_SLOGANS: &[&str] = &[
    "The magic of the moment",
    "Made tangible",
    "The magic of the moment, made tangible",
    "The magic of the moment. Made tangible.",
];

/// Subtitle used when the model hands back a brand slogan as the tagline.
pub const FALLBACK_TAGLINE: &str = "Live Event";

/// Unique identifier of a stored ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Owner of a stored ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

/// Checkout session id issued by the payment provider.
///
/// Acts as a single-use unlock token: once attached to a ticket it stays with
/// that ticket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a raw session id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw session id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Complete design metadata for one ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecord {
    /// Facts about the event.
    pub event_details: EventDetails,
    /// Palette, textures, fonts and mood.
    pub visual_theme: VisualTheme,
    /// Prompts for artwork generation.
    pub ai_prompts: AiPrompts,
    /// Copy shown around the ticket.
    pub gift_copy: GiftCopy,
    /// Layout hints for rendering.
    pub layout_guide: LayoutGuide,
}

impl TicketRecord {
    /// Prompt to feed the image model for the ticket background.
    #[must_use]
    pub fn background_prompt(&self) -> &str {
        &self.ai_prompts.background_prompt
    }
}

/// Event facts extracted from the user's input.
///
/// `artist_or_event`, `venue` and `date` are mandatory in the output schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    /// Headliner or event name
    pub artist_or_event: String,
    /// Venue name, possibly with city
    pub venue: String,
    /// Event date as read from the ticket
    pub date: String,
    /// Section / row / seat
    #[serde(default)]
    pub seat_info: String,
    /// Message from the gift giver
    #[serde(default)]
    pub personal_message: String,
}

/// Visual direction for the ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualTheme {
    /// Ordered color descriptors, dominant first
    pub color_palette: Vec<String>,
    /// Surface textures
    pub textures: Vec<String>,
    /// Headline/body font pair
    pub typography: Typography,
    /// Mood words
    pub mood_keywords: Vec<String>,
    /// Decorative icon suggestions
    pub icon_ideas: Vec<String>,
}

/// Headline and body font names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Typography {
    /// Headline font
    pub headline_font: String,
    /// Body font
    pub body_font: String,
}

/// Prompts for the artwork models.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiPrompts {
    /// Scene description for the ticket background
    pub background_prompt: String,
    /// Foreground art description
    pub ticket_art_prompt: String,
    /// Rendered background, attached only when the ticket is persisted.
    #[serde(
        rename = "cached_image_base64",
        skip_serializing_if = "Option::is_none"
    )]
    pub cached_image: Option<String>,
}

/// Free-text copy for the gift presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GiftCopy {
    /// Page title, e.g. "Your Taylor Swift Keepsake"
    pub ticket_title: String,
    /// Event subtitle printed under the title
    pub tagline: String,
    /// Short warm phrase
    pub emotional_description: String,
    /// Message for the recipient
    pub gift_message: String,
}

impl GiftCopy {
    /// Whether the tagline is one of the brand's own marketing lines.
    #[must_use]
    pub fn tagline_is_slogan(&self) -> bool {
        let tagline = normalize(&self.tagline);
        !tagline.is_empty() && MARKETING_SLOGANS.iter().any(|s| normalize(s) == tagline)
    }

    /// Replace a slogan tagline with [`FALLBACK_TAGLINE`].
    ///
    /// Returns `true` when the tagline was changed.
    pub fn replace_slogan_tagline(&mut self) -> bool {
        if self.tagline_is_slogan() {
            self.tagline = FALLBACK_TAGLINE.to_string();
            true
        } else {
            false
        }
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(['.', '!'])
        .to_lowercase()
}

/// Rendering hints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutGuide {
    /// Named layout
    pub recommended_layout: String,
    /// Notes on visual hierarchy
    pub hierarchy_notes: String,
    /// Per-field font weights
    pub font_weights: FontWeights,
}

impl LayoutGuide {
    /// The fixed layout every loaded ticket renders with.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            recommended_layout: "standard".to_string(),
            hierarchy_notes: String::new(),
            font_weights: FontWeights {
                event_name: "bold".to_string(),
                seat_info: "medium".to_string(),
                extras: "light".to_string(),
            },
        }
    }
}

/// Font weight per ticket field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontWeights {
    /// Event name weight
    pub event_name: String,
    /// Seat info weight
    pub seat_info: String,
    /// Everything else
    pub extras: String,
}
