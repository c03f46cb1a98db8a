//! crates/chatboard_core/src/message_store.rs
//!
//! The shared, append-only message board kept under `chatMessages`.

use crate::domain::{next_record_id, ChatMessage, UserRecord};
use crate::ports::{load_json, save_json, Clock, KeyValueStorage, PortError, CHAT_MESSAGES_KEY};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Message cannot be empty")]
    EmptyMessage,
    #[error(transparent)]
    Storage(#[from] PortError),
}

#[derive(Clone)]
pub struct MessageStore {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
}

impl MessageStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// The full history, oldest first.
    pub async fn load_all(&self) -> Result<Vec<ChatMessage>, PortError> {
        Ok(load_json(self.storage.as_ref(), CHAT_MESSAGES_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Posts `text` as `author`. Surrounding whitespace is dropped; there is no
    /// length limit at this layer.
    pub async fn append(&self, author: &UserRecord, text: &str) -> Result<ChatMessage, MessageError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MessageError::EmptyMessage);
        }

        let mut messages = self.load_all().await?;
        let now = self.clock.now();
        let message = ChatMessage {
            id: next_record_id(now, messages.iter().map(|m| m.id)),
            text: text.to_string(),
            author_id: author.id,
            author_name: author.name.clone(),
            sent_at: now,
        };

        messages.push(message.clone());
        save_json(self.storage.as_ref(), CHAT_MESSAGES_KEY, &messages).await?;

        debug!(message_id = message.id, author_id = author.id, "message appended");
        Ok(message)
    }
}
