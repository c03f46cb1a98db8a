//! crates/chatboard_core/src/ports.rs
//!
//! Defines the service contracts (traits) the stores depend on.
//! The stores never touch a concrete storage medium or the system clock
//! directly; callers inject implementations of these ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Stored value under '{key}' is not valid: {reason}")]
    Corrupted { key: String, reason: String },
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Storage keys
//=========================================================================================

/// JSON array of `UserRecord`.
pub const USERS_KEY: &str = "users";
/// JSON object of the authenticated `UserRecord`; absent when anonymous.
pub const CURRENT_USER_KEY: &str = "currentUser";
/// JSON array of `ChatMessage`, oldest first.
pub const CHAT_MESSAGES_KEY: &str = "chatMessages";

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// A string key-value store with the semantics of browser local storage.
///
/// Each call completes its write before returning. There is no transaction
/// across keys; concurrent writers on the same medium are last-write-wins.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> PortResult<Option<String>>;

    async fn set_item(&self, key: &str, value: &str) -> PortResult<()>;

    /// Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> PortResult<()>;

    async fn clear(&self) -> PortResult<()>;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

//=========================================================================================
// JSON helpers over a storage port
//=========================================================================================

/// Reads and decodes the value under `key`, or `None` if it was never written.
pub async fn load_json<T: DeserializeOwned>(
    storage: &dyn KeyValueStorage,
    key: &str,
) -> PortResult<Option<T>> {
    let Some(raw) = storage.get_item(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| PortError::Corrupted {
            key: key.to_string(),
            reason: e.to_string(),
        })
}

/// Encodes `value` and writes it under `key`.
pub async fn save_json<T: Serialize + ?Sized>(
    storage: &dyn KeyValueStorage,
    key: &str,
    value: &T,
) -> PortResult<()> {
    let raw = serde_json::to_string(value).map_err(|e| PortError::Unexpected(e.to_string()))?;
    storage.set_item(key, &raw).await
}
