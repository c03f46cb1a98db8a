//! services/chatboard/src/state.rs
//!
//! Defines the shared application state: the stores, built once over a single
//! storage medium and handed to every command.

use crate::adapters::{JsonFileStorage, SqliteStorage};
use crate::config::{Config, StorageKind};
use crate::error::AppError;
use chatboard_core::ports::{Clock, KeyValueStorage, SystemClock};
use chatboard_core::{MemoryStorage, MessageStore, SessionGate, UserStore};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub messages: MessageStore,
    pub gate: SessionGate,
}

impl AppState {
    /// Wires the stores over an already opened storage medium.
    pub fn new(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        let users = UserStore::new(storage.clone(), clock.clone());
        let messages = MessageStore::new(storage, clock);
        let gate = SessionGate::new(users.clone());
        Self {
            users,
            messages,
            gate,
        }
    }

    /// Opens the storage medium named by `config` with the system clock.
    pub async fn open(config: &Config) -> Result<Self, AppError> {
        let storage: Arc<dyn KeyValueStorage> = match config.storage {
            StorageKind::Json => Arc::new(JsonFileStorage::open(&config.data_path).await?),
            StorageKind::Sqlite => Arc::new(SqliteStorage::connect(&config.data_path).await?),
            StorageKind::Memory => Arc::new(MemoryStorage::new()),
        };
        info!(storage = ?config.storage, path = %config.data_path.display(), "storage ready");
        Ok(Self::new(storage, Arc::new(SystemClock)))
    }
}
