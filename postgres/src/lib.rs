//! `PostgreSQL` storage for PrettyTickets.
//!
//! This crate provides [`PostgresTicketRepository`], the production
//! implementation of the `TicketRepository` trait from `prettytickets-core`.
//! It uses sqlx with a connection pool and supports:
//!
//! - Schema migrations embedded at build time
//! - JSONB documents for each design section
//! - Session uniqueness enforced by a `UNIQUE` constraint
//!
//! # Example
//!
//! ```ignore
//! use prettytickets_postgres::{PoolSettings, PostgresTicketRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = PoolSettings::new("postgres://localhost/prettytickets");
//!     let repository = PostgresTicketRepository::connect(&settings).await?;
//!     repository.migrate().await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod pool;
mod tickets;

pub use pool::PoolSettings;
pub use tickets::PostgresTicketRepository;
