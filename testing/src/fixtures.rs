//! Sample tickets and model output.

use prettytickets_core::{
    AiPrompts, EventDetails, FontWeights, GiftCopy, LayoutGuide, TicketRecord, Typography,
    VisualTheme,
};
use serde_json::{Value, json};

/// A one-pixel PNG as a data URI.
pub const SAMPLE_IMAGE_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

/// Ticket text a user might type.
pub const SAMPLE_TICKET_TEXT: &str = "Taylor Swift, MetLife Stadium, 08/15/2025, Sec 12 Row A";

/// The record [`sample_document`] deserializes to.
#[must_use]
pub fn sample_record() -> TicketRecord {
    TicketRecord {
        event_details: EventDetails {
            artist_or_event: "Taylor Swift".to_string(),
            venue: "MetLife Stadium".to_string(),
            date: "08/15/2025".to_string(),
            seat_info: "Sec 12 Row A".to_string(),
            personal_message: String::new(),
        },
        visual_theme: VisualTheme {
            color_palette: vec![
                "blush pink".to_string(),
                "lavender".to_string(),
                "midnight blue".to_string(),
            ],
            textures: vec!["holographic foil".to_string(), "glitter".to_string()],
            typography: Typography {
                headline_font: "Playfair Display".to_string(),
                body_font: "Inter".to_string(),
            },
            mood_keywords: vec!["dreamy".to_string(), "nostalgic".to_string()],
            icon_ideas: vec!["stars".to_string(), "friendship bracelets".to_string()],
        },
        ai_prompts: AiPrompts {
            background_prompt: "A glittering stadium under a lavender aurora, soft bokeh"
                .to_string(),
            ticket_art_prompt: "Sparkling stars and sequins".to_string(),
            cached_image: None,
        },
        gift_copy: GiftCopy {
            ticket_title: "Your Taylor Swift Keepsake".to_string(),
            tagline: "The Eras Tour".to_string(),
            emotional_description: "A memory to last a lifetime".to_string(),
            gift_message: "For the best night of the year".to_string(),
        },
        layout_guide: LayoutGuide {
            recommended_layout: "classic".to_string(),
            hierarchy_notes: "Artist first, then date and seat".to_string(),
            font_weights: FontWeights {
                event_name: "bold".to_string(),
                seat_info: "medium".to_string(),
                extras: "light".to_string(),
            },
        },
    }
}

/// [`sample_record`] as the JSON document the model returns.
#[must_use]
pub fn sample_document() -> Value {
    json!({
        "eventDetails": {
            "artistOrEvent": "Taylor Swift",
            "venue": "MetLife Stadium",
            "date": "08/15/2025",
            "seatInfo": "Sec 12 Row A",
            "personalMessage": ""
        },
        "visualTheme": {
            "colorPalette": ["blush pink", "lavender", "midnight blue"],
            "textures": ["holographic foil", "glitter"],
            "typography": { "headlineFont": "Playfair Display", "bodyFont": "Inter" },
            "moodKeywords": ["dreamy", "nostalgic"],
            "iconIdeas": ["stars", "friendship bracelets"]
        },
        "aiPrompts": {
            "backgroundPrompt": "A glittering stadium under a lavender aurora, soft bokeh",
            "ticketArtPrompt": "Sparkling stars and sequins"
        },
        "giftCopy": {
            "ticketTitle": "Your Taylor Swift Keepsake",
            "tagline": "The Eras Tour",
            "emotionalDescription": "A memory to last a lifetime",
            "giftMessage": "For the best night of the year"
        },
        "layoutGuide": {
            "recommendedLayout": "classic",
            "hierarchyNotes": "Artist first, then date and seat",
            "fontWeights": { "eventName": "bold", "seatInfo": "medium", "extras": "light" }
        }
    })
}

/// [`sample_record`] for a different act, for multi-ticket tests.
#[must_use]
pub fn record_for(artist: &str) -> TicketRecord {
    let mut record = sample_record();
    record.event_details.artist_or_event = artist.to_string();
    record.gift_copy.ticket_title = format!("Your {artist} Keepsake");
    record
}
