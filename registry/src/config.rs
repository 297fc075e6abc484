//! Configuration management for the registry.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Durable store configuration.
    pub store: StoreConfig,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

/// Durable store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the persisted ticket collection.
    pub path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `TICKET_STORE_PATH` (default `./data`) and `RUST_LOG` (default `info`).
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            store: StoreConfig {
                path: env::var("TICKET_STORE_PATH")
                    .map_or_else(|_| PathBuf::from("./data"), PathBuf::from),
            },
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}
