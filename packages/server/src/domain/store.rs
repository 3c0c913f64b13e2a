//! Message store trait: the persistence seam of the chat subsystem.
//!
//! UseCase 層は trait（ドメイン層）に依存し、具体的な実装（SQLite / インメモリ）
//! には直接依存しません（依存性の逆転）。

use async_trait::async_trait;

use super::{
    entity::ChatMessage,
    error::StorageError,
    value_object::{LevelNumber, MessageContent, Username},
};

/// Durable, append-only log of chat messages, partitioned by level.
///
/// Implementations must be safe for concurrent use across rooms. Calls for a
/// single level are already serialized by that level's `Room`, so no per-level
/// ordering guarantee is required beyond the atomicity of one call.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist one message and assign its `created_at` timestamp.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store is unavailable. A message
    /// that failed to persist must not be broadcast.
    async fn append(
        &self,
        level: LevelNumber,
        author: Username,
        content: MessageContent,
    ) -> Result<ChatMessage, StorageError>;

    /// Return up to `limit` most recent messages for `level`, oldest first.
    ///
    /// An empty vector is returned when the level has no stored messages.
    async fn recent(
        &self,
        level: LevelNumber,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, StorageError>;
}
