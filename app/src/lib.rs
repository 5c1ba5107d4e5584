//! # PrettyTickets
//!
//! HTTP service that turns plain event tickets into collectible, gift-ready
//! designs.
//!
//! - [`config`]: environment configuration, validated once at startup
//! - [`studio`]: [`TicketStudio`], the composition of generators and store
//! - [`server`]: axum router, state, error responses and middleware
//! - [`api`]: request handlers
//! - [`metrics`]: metric descriptions and the Prometheus exporter
//!
//! ## Example
//!
//! ```ignore
//! use prettytickets::{Config, TicketStudio, server::{AppState, build_router}};
//!
//! let config = Config::from_env();
//! config.validate()?;
//!
//! let studio = TicketStudio::new(client, text_model, image_model, store);
//! let app = build_router(AppState::new(studio));
//! axum::serve(listener, app).await?;
//! ```

pub mod api;
pub mod config;
pub mod metrics;
pub mod server;
pub mod studio;

pub use config::{Config, ConfigError, DatabaseConfig, ServerConfig};
pub use studio::{CreatedTicket, TicketStudio};
