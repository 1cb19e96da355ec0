//! Configuration management for the election store
//!
//! Loads settings from environment variables with validation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Store behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum attempts when retrying a transient storage failure
    pub max_retry_attempts: u32,

    /// Delay between retry attempts in milliseconds
    pub retry_backoff_ms: u64,
}

impl StoreConfig {
    /// Load store configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let max_retry_attempts = std::env::var("BALLOTBOX_MAX_RETRY_ATTEMPTS")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .map_err(|_| Error::validation("Invalid BALLOTBOX_MAX_RETRY_ATTEMPTS"))?;

        let retry_backoff_ms = std::env::var("BALLOTBOX_RETRY_BACKOFF_MS")
            .unwrap_or_else(|_| "25".to_string())
            .parse()
            .map_err(|_| Error::validation("Invalid BALLOTBOX_RETRY_BACKOFF_MS"))?;

        let config = Self {
            max_retry_attempts,
            retry_backoff_ms,
        };
        config.validate()?;

        Ok(config)
    }

    /// Create configuration for testing
    pub fn for_testing() -> Self {
        Self {
            max_retry_attempts: 3,
            retry_backoff_ms: 1, // Keep tests fast
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.max_retry_attempts == 0 {
            return Err(Error::validation(
                "BALLOTBOX_MAX_RETRY_ATTEMPTS must be at least 1",
            ));
        }

        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_retry_attempts: 3,
            retry_backoff_ms: 25,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store = StoreConfig::from_env()?;

        let logging = LoggingConfig {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
        };

        Ok(Self { store, logging })
    }

    /// Create configuration for testing
    pub fn for_testing() -> Self {
        Self {
            store: StoreConfig::for_testing(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
