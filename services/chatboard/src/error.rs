//! services/chatboard/src/error.rs
//!
//! Defines the primary error type for the chatboard front end.

use crate::config::ConfigError;
use chatboard_core::ports::PortError;

/// Errors that end a command. Domain rejections (bad form input, wrong
/// password, empty message) are not here; they are rendered inline.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core ports.
    #[error("Storage error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a failure to bring the database schema up to date.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Command line input that could not be turned into a form value.
    #[error("{0}")]
    Input(String),
}
