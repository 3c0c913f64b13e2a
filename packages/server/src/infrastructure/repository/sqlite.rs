//! SQLite MessageStore 実装
//!
//! sqlx の SQLite プールを使用した永続化実装。`chat_messages` テーブルへの
//! 追記のみを行い、更新・削除は行いません。

use async_trait::async_trait;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

use takarabako_shared::time::unix_timestamp_millis;

use crate::domain::{
    ChatMessage, LevelNumber, MessageContent, MessageStore, StorageError, Timestamp, Username,
};

/// Durable message log backed by SQLite.
pub struct SqliteMessageStore {
    pool: SqlitePool,
}

impl SqliteMessageStore {
    /// Connect to `url` and make sure the message table exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the database cannot be opened.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        // SQLite allows a single writer at a time, and a `sqlite::memory:`
        // database exists per connection; one pooled connection covers both.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chat_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                level INTEGER NOT NULL,
                username TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_chat_messages_level
             ON chat_messages (level, id)",
        )
        .execute(&pool)
        .await
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn append(
        &self,
        level: LevelNumber,
        author: Username,
        content: MessageContent,
    ) -> Result<ChatMessage, StorageError> {
        let created_at = Timestamp::new(unix_timestamp_millis());

        sqlx::query(
            "INSERT INTO chat_messages (level, username, content, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(i64::from(level.value()))
        .bind(author.as_str())
        .bind(content.as_str())
        .bind(created_at.value())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        Ok(ChatMessage::new(level, author, content, created_at))
    }

    async fn recent(
        &self,
        level: LevelNumber,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, StorageError> {
        let rows: Vec<(String, String, i64)> = sqlx::query_as(
            "SELECT username, content, created_at FROM chat_messages
             WHERE level = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(i64::from(level.value()))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        // Rows come newest-first; replay order is oldest-first
        rows.into_iter()
            .rev()
            .map(|(username, content, created_at)| {
                Ok(ChatMessage::new(
                    level,
                    Username::new(username).map_err(|e| StorageError::Corrupt(e.to_string()))?,
                    MessageContent::new(content)
                        .map_err(|e| StorageError::Corrupt(e.to_string()))?,
                    Timestamp::new(created_at),
                ))
            })
            .collect()
    }
}
