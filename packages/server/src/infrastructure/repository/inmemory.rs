//! InMemory MessageStore 実装
//!
//! HashMap をインメモリ DB として使用する実装。テストとローカル実験のための
//! ものであり、プロセスを跨いだ永続化はされません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use takarabako_shared::time::unix_timestamp_millis;

use crate::domain::{
    ChatMessage, LevelNumber, MessageContent, MessageStore, StorageError, Timestamp, Username,
};

/// In-memory message log, partitioned by level.
pub struct InMemoryMessageStore {
    messages: Mutex<HashMap<LevelNumber, Vec<ChatMessage>>>,
}

impl InMemoryMessageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(
        &self,
        level: LevelNumber,
        author: Username,
        content: MessageContent,
    ) -> Result<ChatMessage, StorageError> {
        let message = ChatMessage::new(
            level,
            author,
            content,
            Timestamp::new(unix_timestamp_millis()),
        );

        let mut messages = self.messages.lock().await;
        messages.entry(level).or_default().push(message.clone());

        Ok(message)
    }

    async fn recent(
        &self,
        level: LevelNumber,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, StorageError> {
        let messages = self.messages.lock().await;
        let log = messages.get(&level).map(Vec::as_slice).unwrap_or_default();
        let start = log.len().saturating_sub(limit);
        Ok(log[start..].to_vec())
    }
}
