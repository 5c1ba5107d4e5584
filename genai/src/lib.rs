//! # PrettyTickets Generative Content
//!
//! Client for the Gemini `generateContent` API and the two generators built
//! on it: structured ticket metadata and background artwork.
//!
//! ## Example
//!
//! ```no_run
//! use prettytickets_genai::{GeminiClient, GeminiConfig, ImageGenerator, MetadataGenerator, TicketInput};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GeminiConfig::new(std::env::var("GEMINI_API_KEY")?)?;
//!     let client = Arc::new(GeminiClient::new(&config)?);
//!
//!     let metadata = MetadataGenerator::new(Arc::clone(&client));
//!     let record = metadata
//!         .generate(&TicketInput::text("Taylor Swift, MetLife Stadium, 08/15/2025, Sec 12 Row A"))
//!         .await?;
//!
//!     let images = ImageGenerator::new(client);
//!     let background = images.generate(record.background_prompt()).await;
//!     println!("{} / image: {}", record.gift_copy.ticket_title, background.is_generated());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - Text, image, or text+image ticket input (`data:` URIs accepted)
//! - Structured JSON output validated against the ticket schema
//! - Best-effort image generation that never fails the caller

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod image;
pub mod input;
pub mod metadata;
pub mod model;
pub mod prompts;
pub mod types;

// Re-export main types for convenience
pub use client::{DEFAULT_API_BASE, GeminiClient, GeminiConfig};
pub use error::GenAiError;
pub use image::{DEFAULT_IMAGE_MODEL, ImageGenerator, ImageOutcome};
pub use input::{InlineImage, TicketInput};
pub use metadata::{DEFAULT_TEXT_MODEL, MetadataGenerator};
pub use model::GenerativeModel;
pub use types::{GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};
