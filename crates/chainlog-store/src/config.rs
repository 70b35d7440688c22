//! Store configuration read from the environment.
//!
//! The ledger itself only borrows a pool handle. This module exists for
//! embedding services that want to build that pool the standard way.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    /// An environment variable holds an unusable value.
    #[error("{name} must be {expected}: {message}")]
    Invalid {
        /// The variable name.
        name: &'static str,
        /// What the value should have been.
        expected: &'static str,
        /// Parser error.
        message: String,
    },

    /// Connecting to the database failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Connection settings for the ledger's backing pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// `PostgreSQL` connection URL (`DATABASE_URL`).
    pub database_url: String,
    /// Pool size (`DATABASE_MAX_CONNECTIONS`, default 10).
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection
    /// (`DATABASE_ACQUIRE_TIMEOUT_SECS`, default 5).
    pub acquire_timeout: Duration,
}

impl StoreConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `DATABASE_URL` is unset or a numeric
    /// variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `DATABASE_URL` is missing or a numeric
    /// variable does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse().map_err(|e| ConfigError::Invalid {
                name: "DATABASE_MAX_CONNECTIONS",
                expected: "a valid u32",
                message: format!("{e}"),
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let acquire_timeout_secs = match lookup("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|e| ConfigError::Invalid {
                name: "DATABASE_ACQUIRE_TIMEOUT_SECS",
                expected: "a whole number of seconds",
                message: format!("{e}"),
            })?,
            None => DEFAULT_ACQUIRE_TIMEOUT_SECS,
        };

        Ok(Self {
            database_url,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        })
    }

    /// Creates a connection pool from this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Database` if the initial connection fails.
    pub async fn connect(&self) -> Result<PgPool, ConfigError> {
        tracing::info!(
            max_connections = self.max_connections,
            "connecting broadcast ledger pool"
        );
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .connect(&self.database_url)
            .await?;
        Ok(pool)
    }
}
