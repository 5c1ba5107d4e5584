//! # PrettyTickets Testing
//!
//! Testing utilities and fakes for PrettyTickets.
//!
//! This crate provides:
//! - Mock implementations of environment traits (clocks)
//! - [`InMemoryTicketRepository`]: a `TicketRepository` with the same
//!   uniqueness rules as the database
//! - [`ScriptedModel`]: a `GenerativeModel` that replays queued responses
//! - Fixtures for ticket records and model output
//!
//! ## Example
//!
//! ```ignore
//! use prettytickets_core::{SessionId, TicketStore};
//! use prettytickets_testing::{InMemoryTicketRepository, fixtures};
//!
//! #[tokio::test]
//! async fn test_unlock() {
//!     let store = TicketStore::connected(InMemoryTicketRepository::new());
//!     let id = store.save(&fixtures::sample_record(), "").await?.id().unwrap();
//!
//!     let outcome = store.mark_paid(id, &SessionId::new("cs_test")).await;
//!     assert!(outcome.is_success());
//! }
//! ```

use chrono::{DateTime, Duration, Utc};
use prettytickets_core::environment::Clock;

mod model_mocks;
mod ticket_mocks;

pub mod fixtures;

pub use model_mocks::ScriptedModel;
pub use ticket_mocks::InMemoryTicketRepository;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Duration, Utc};
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use prettytickets_testing::mocks::FixedClock;
    /// use prettytickets_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step on every read.
    ///
    /// Gives rows strictly increasing timestamps without sleeping.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Start at `start`, advancing by `step` per call
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        #[allow(clippy::unwrap_used)] // Test infrastructure
        fn now(&self) -> DateTime<Utc> {
            let mut next = self.next.lock().unwrap();
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(epoch())
    }

    /// Stepping clock starting at 2025-01-01 00:00:00 UTC, one second per read
    #[must_use]
    pub fn stepping_clock() -> SteppingClock {
        SteppingClock::new(epoch(), Duration::seconds(1))
    }

    fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default()
    }
}

/// Install a `tracing` subscriber for test output; safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, SteppingClock, stepping_clock, test_clock};
