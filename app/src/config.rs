//! Configuration management for PrettyTickets.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The generative API and the database are both optional: without an API key
//! generation endpoints report a configuration error, and without a database
//! URL the service runs in demo mode.

use prettytickets_genai::{DEFAULT_API_BASE, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL, GeminiConfig};
use prettytickets_postgres::PoolSettings;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,prettytickets=debug,sqlx=warn";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Generative API settings, `None` without an API key
    pub gemini: Option<GeminiConfig>,
    /// Database settings, `None` without a database URL
    pub database: Option<DatabaseConfig>,
    /// HTTP server settings
    pub server: ServerConfig,
}

/// `PostgreSQL` configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections in the pool
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout: u64,
    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

impl DatabaseConfig {
    /// Pool settings for the repository.
    #[must_use]
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            url: self.url.clone(),
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            connect_timeout: Duration::from_secs(self.connect_timeout),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log filter (trace, debug, info, warn, error or an `EnvFilter` directive)
    pub log_level: String,
    /// Prometheus exporter port; no exporter when unset
    pub metrics_port: Option<u16>,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

impl ServerConfig {
    /// `host:port` to bind the HTTP listener to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `PORT` is zero
    #[error("PORT must be non-zero")]
    InvalidPort,

    /// `METRICS_PORT` clashes with `PORT` or is zero
    #[error("METRICS_PORT must be non-zero and differ from PORT")]
    InvalidMetricsPort,

    /// The database URL is not a postgres URL
    #[error("DATABASE_URL must start with postgres:// or postgresql://")]
    InvalidDatabaseUrl,

    /// Pool bounds are inconsistent
    #[error("DATABASE_MIN_CONNECTIONS ({min}) exceeds DATABASE_MAX_CONNECTIONS ({max})")]
    InvalidPoolSize {
        /// Configured minimum
        min: u32,
        /// Configured maximum
        max: u32,
    },

    /// The API base is not an http(s) URL
    #[error("GEMINI_API_BASE must be an http(s) URL")]
    InvalidApiBase,
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its
    /// value.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let trimmed = |key: &str| non_blank(key).map(|v| v.trim().to_string());

        let gemini = non_blank("GEMINI_API_KEY")
            .or_else(|| non_blank("API_KEY"))
            .map(|api_key| {
                let timeout_secs: u64 = parse(trimmed("GEMINI_TIMEOUT_SECS")).unwrap_or(60);
                GeminiConfig {
                    api_key,
                    api_base: non_blank("GEMINI_API_BASE")
                        .map_or_else(|| DEFAULT_API_BASE.to_string(), |b| {
                            b.trim_end_matches('/').to_string()
                        }),
                    text_model: non_blank("GEMINI_TEXT_MODEL")
                        .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
                    image_model: non_blank("GEMINI_IMAGE_MODEL")
                        .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
                    timeout: (timeout_secs > 0).then_some(Duration::from_secs(timeout_secs)),
                }
            });

        let database = non_blank("DATABASE_URL").map(|url| DatabaseConfig {
            url,
            max_connections: parse(trimmed("DATABASE_MAX_CONNECTIONS")).unwrap_or(10),
            min_connections: parse(trimmed("DATABASE_MIN_CONNECTIONS")).unwrap_or(1),
            connect_timeout: parse(trimmed("DATABASE_CONNECT_TIMEOUT")).unwrap_or(30),
            run_migrations: parse(trimmed("DATABASE_RUN_MIGRATIONS")).unwrap_or(true),
        });

        let server = ServerConfig {
            host: non_blank("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse(trimmed("PORT")).unwrap_or(8080),
            log_level: non_blank("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            metrics_port: parse(trimmed("METRICS_PORT")),
            shutdown_timeout: parse(trimmed("SHUTDOWN_TIMEOUT")).unwrap_or(30),
        };

        Self {
            gemini,
            database,
            server,
        }
    }

    /// Reject values that would only fail later at runtime.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if let Some(metrics_port) = self.server.metrics_port {
            if metrics_port == 0 || metrics_port == self.server.port {
                return Err(ConfigError::InvalidMetricsPort);
            }
        }

        if let Some(database) = &self.database {
            if !(database.url.starts_with("postgres://") || database.url.starts_with("postgresql://"))
            {
                return Err(ConfigError::InvalidDatabaseUrl);
            }
            if database.min_connections > database.max_connections {
                return Err(ConfigError::InvalidPoolSize {
                    min: database.min_connections,
                    max: database.max_connections,
                });
            }
        }

        if let Some(gemini) = &self.gemini {
            if !(gemini.api_base.starts_with("http://") || gemini.api_base.starts_with("https://")) {
                return Err(ConfigError::InvalidApiBase);
            }
        }

        Ok(())
    }
}

fn parse<T: FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.parse().ok())
}
