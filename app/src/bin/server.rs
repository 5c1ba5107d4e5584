//! PrettyTickets HTTP server.
//!
//! Loads configuration from the environment (and `.env`), wires the Gemini
//! client and `PostgreSQL` repository into a [`TicketStudio`], and serves the
//! API until Ctrl+C or SIGTERM.

use anyhow::Context;
use prettytickets::{
    Config, TicketStudio,
    metrics::install_exporter,
    server::{AppState, build_router},
};
use prettytickets_core::TicketStore;
use prettytickets_genai::GeminiClient;
use prettytickets_postgres::PostgresTicketRepository;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::Notify;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to read .env: {e}");
        }
    }

    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.server.log_level)
                .unwrap_or_else(|_| EnvFilter::new(prettytickets::config::DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate().context("Invalid configuration")?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting PrettyTickets");

    if let Some(port) = config.server.metrics_port {
        let addr: SocketAddr = format!("{}:{port}", config.server.host)
            .parse()
            .context("Invalid metrics address")?;
        install_exporter(addr)?;
    }

    let store = match &config.database {
        Some(database) => {
            info!(
                max_connections = database.max_connections,
                "Connecting to PostgreSQL"
            );
            let repository = PostgresTicketRepository::connect(&database.pool_settings())
                .await
                .context("Failed to connect to PostgreSQL")?;
            if database.run_migrations {
                repository
                    .migrate()
                    .await
                    .context("Failed to run migrations")?;
                info!("Migrations applied");
            }
            TicketStore::connected(repository)
        }
        None => {
            warn!("DATABASE_URL not set; running in demo mode, tickets will not be saved");
            TicketStore::demo()
        }
    };

    let studio = match &config.gemini {
        Some(gemini) => {
            let client = GeminiClient::new(gemini).context("Failed to build Gemini client")?;
            info!(
                text_model = %gemini.text_model,
                image_model = %gemini.image_model,
                "Gemini client configured"
            );
            TicketStudio::new(
                client,
                gemini.text_model.clone(),
                gemini.image_model.clone(),
                store,
            )
        }
        None => {
            warn!("GEMINI_API_KEY not set; ticket generation is disabled");
            TicketStudio::<GeminiClient, _>::without_ai(store)
        }
    };

    let app = build_router(AppState::new(studio));

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %addr, "HTTP server listening");

    let draining = Arc::new(Notify::new());
    let signalled = Arc::clone(&draining);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            signalled.notify_one();
        })
        .into_future();

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout);
    tokio::select! {
        result = server => result.context("HTTP server failed")?,
        () = async {
            draining.notified().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            warn!(
                timeout_secs = config.server.shutdown_timeout,
                "Graceful shutdown timed out, dropping open connections"
            );
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
