//! services/chatboard/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which storage medium backs the stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageKind {
    /// A single JSON object file, one entry per storage key.
    Json,
    Sqlite,
    /// Process-local; nothing survives the process.
    Memory,
}

impl StorageKind {
    fn default_path(&self) -> PathBuf {
        match self {
            StorageKind::Json => PathBuf::from("./chatboard.json"),
            StorageKind::Sqlite => PathBuf::from("./chatboard.db"),
            StorageKind::Memory => PathBuf::new(),
        }
    }
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(StorageKind::Json),
            "sqlite" => Ok(StorageKind::Sqlite),
            "memory" => Ok(StorageKind::Memory),
            other => Err(format!(
                "'{}' is not a storage kind (json, sqlite, memory)",
                other
            )),
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub storage: StorageKind,
    pub data_path: PathBuf,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage = match lookup("CHATBOARD_STORAGE") {
            Some(raw) => raw
                .parse::<StorageKind>()
                .map_err(|e| ConfigError::InvalidValue("CHATBOARD_STORAGE".to_string(), e))?,
            None => StorageKind::Json,
        };

        let data_path = match lookup("CHATBOARD_DATA_PATH") {
            Some(raw) if raw.trim().is_empty() => {
                return Err(ConfigError::InvalidValue(
                    "CHATBOARD_DATA_PATH".to_string(),
                    "path must not be empty".to_string(),
                ))
            }
            Some(raw) => PathBuf::from(raw),
            None => storage.default_path(),
        };

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "WARN".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            storage,
            data_path,
            log_level,
        })
    }
}
