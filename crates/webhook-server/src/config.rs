//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use database::Database;
use whatsapp_gateway::DEFAULT_TIMEOUT;

/// Webhook server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Maximum database connections.
    pub pool_size: u32,
    /// Bound on each call to the WhatsApp gateway.
    pub gateway_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `WEBHOOK_ADDR` | Server bind address | `0.0.0.0:8790` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:chatbot.db?mode=rwc` |
    /// | `DATABASE_POOL_SIZE` | Database pool size | `20` |
    /// | `GATEWAY_TIMEOUT_SECS` | Per-call gateway timeout | `15` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("WEBHOOK_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8790".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:chatbot.db?mode=rwc".to_string());

        let pool_size = number_var("DATABASE_POOL_SIZE", Database::DEFAULT_POOL_SIZE)?;
        let gateway_timeout = Duration::from_secs(number_var(
            "GATEWAY_TIMEOUT_SECS",
            DEFAULT_TIMEOUT.as_secs(),
        )?);

        Ok(Self {
            addr,
            database_url,
            pool_size,
            gateway_timeout,
        })
    }
}

fn number_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid WEBHOOK_ADDR format")]
    InvalidAddr,

    #[error("{0} must be a whole number")]
    InvalidNumber(&'static str),
}
