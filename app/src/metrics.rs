//! Prometheus metrics for PrettyTickets.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `prettytickets_generations_total{kind, outcome}` - Generator calls by
//!   kind (metadata, image) and outcome
//! - `prettytickets_tickets_saved_total` - Tickets written to the store
//! - `prettytickets_ticket_save_failures_total` - Generated tickets the store
//!   failed to save
//! - `prettytickets_unlocks_total{outcome}` - Unlock attempts by outcome

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use thiserror::Error;

/// Errors from metrics setup.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Register all metric descriptions.
///
/// Call once at startup, after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "prettytickets_generations_total",
        "Total number of generator calls by kind (metadata, image) and outcome"
    );
    describe_counter!(
        "prettytickets_tickets_saved_total",
        "Total number of tickets saved"
    );
    describe_counter!(
        "prettytickets_ticket_save_failures_total",
        "Total number of generated tickets that could not be saved"
    );
    describe_counter!(
        "prettytickets_unlocks_total",
        "Total number of unlock attempts by outcome"
    );

    tracing::info!("Metrics registered");
}

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must run inside a Tokio runtime; the exporter's listener is spawned onto
/// it. A recorder that is already installed is tolerated.
///
/// # Errors
///
/// Returns [`MetricsError::Install`] if the exporter cannot be built or bound.
pub fn install_exporter(addr: SocketAddr) -> Result<(), MetricsError> {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            register_metrics();
            tracing::info!(
                addr = %addr,
                "Metrics exporter started - available at http://{}/metrics",
                addr
            );
            Ok(())
        }
        Err(e) => {
            let err_msg = e.to_string();
            if err_msg.contains("already initialized") {
                tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                Ok(())
            } else {
                Err(MetricsError::Install(err_msg))
            }
        }
    }
}
