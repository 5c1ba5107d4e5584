//! API endpoints for PrettyTickets.
//!
//! - Tickets: design, list, fetch and unlock tickets
//! - Images: standalone background rendering

pub mod images;
pub mod tickets;

pub use images::generate_image;
pub use tickets::{generate_ticket, get_ticket, list_tickets, unlock_ticket};
