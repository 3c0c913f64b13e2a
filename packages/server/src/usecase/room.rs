//! UseCase: レベル別チャットルーム
//!
//! 1 レベル = 1 ルーム。参加・退出・メッセージ受信はルームごとの
//! クリティカルセクションで直列化され、異なるレベルのルームは完全に並行して
//! 動作します。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - join() の履歴返却と live 配信の整合性（取りこぼし・二重配信なし）
//! - receive() の永続化順 = 配信順、送信者自身への配信
//! - leave() の冪等性
//! - ストア障害時の fail-closed（配信しない）
//!
//! ### なぜこのテストが必要か
//! - ルームはメッセージ順序保証を担う唯一のコンポーネント
//! - 切断・再参加が頻発しても接続集合が壊れないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系: 複数接続への全員配信、履歴リプレイ
//! - 異常系: append 失敗、リタイア済みルームへの join
//! - エッジケース: 二重 leave、履歴上限超過

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, mpsc::UnboundedSender};

use crate::{
    domain::{
        ChatMessage, ConnectionId, LevelNumber, MessageContent, MessageStore, StorageError,
        Username,
    },
    infrastructure::dto::websocket::WireMessage,
};

use super::error::JoinError;

/// Maximum number of stored messages replayed to a joining connection.
pub const HISTORY_LIMIT: usize = 50;

/// The live broadcast domain for one level.
///
/// All membership changes and broadcasts for the level run one at a time
/// inside the room's critical section; rooms for different levels share
/// nothing but the message store and proceed in parallel.
pub struct Room {
    level: LevelNumber,
    store: Arc<dyn MessageStore>,
    inner: Mutex<RoomInner>,
}

/// Mutable room state, touched only inside the critical section.
struct RoomInner {
    /// Live connections, keyed by connection id
    connections: HashMap<ConnectionId, UnboundedSender<String>>,
    /// Set when the registry removes the room; joins must retry
    retired: bool,
}

impl Room {
    /// Create an empty room for `level` backed by `store`.
    pub fn new(level: LevelNumber, store: Arc<dyn MessageStore>) -> Self {
        Self {
            level,
            store,
            inner: Mutex::new(RoomInner {
                connections: HashMap::new(),
                retired: false,
            }),
        }
    }

    /// Level this room belongs to.
    pub fn level(&self) -> LevelNumber {
        self.level
    }

    /// Register a connection and return the history to replay to it.
    ///
    /// The history fetch and the registration happen inside the same critical
    /// section that `receive` uses, so a message accepted concurrently is
    /// either part of the returned history or delivered live through
    /// `sender`, never both and never neither.
    ///
    /// A history fetch failure degrades to an empty history; the join itself
    /// still succeeds.
    ///
    /// # Errors
    ///
    /// Returns `JoinError::Retired` if the registry has already retired this
    /// room. The caller must fetch a fresh instance and retry.
    pub async fn join(
        &self,
        connection_id: ConnectionId,
        sender: UnboundedSender<String>,
    ) -> Result<Vec<ChatMessage>, JoinError> {
        let mut inner = self.inner.lock().await;
        if inner.retired {
            return Err(JoinError::Retired);
        }

        let history = match self.store.recent(self.level, HISTORY_LIMIT).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::error!("Failed to fetch history for level {}: {}", self.level, e);
                Vec::new()
            }
        };

        inner.connections.insert(connection_id, sender);
        Ok(history)
    }

    /// Remove a connection from the live set.
    ///
    /// Removing an unknown or already-removed connection is a no-op.
    pub async fn leave(&self, connection_id: &ConnectionId) {
        let mut inner = self.inner.lock().await;
        inner.connections.remove(connection_id);
    }

    /// Accept one message: persist it, then broadcast it to every live
    /// connection in this room, including the sender.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the append fails; nothing is broadcast in
    /// that case.
    pub async fn receive(
        &self,
        author: Username,
        content: MessageContent,
    ) -> Result<ChatMessage, StorageError> {
        let inner = self.inner.lock().await;

        // Appending inside the critical section makes persistence order and
        // broadcast order identical for this room.
        let message = self.store.append(self.level, author, content).await?;

        let payload = serde_json::to_string(&WireMessage::from(&message)).unwrap();
        for (connection_id, sender) in inner.connections.iter() {
            if sender.send(payload.clone()).is_err() {
                // The send task is gone; the adapter reports the disconnect
                // through leave()
                tracing::warn!(
                    "Failed to queue message for connection '{}'",
                    connection_id
                );
            }
        }

        Ok(message)
    }

    /// Number of live connections.
    pub async fn connection_count(&self) -> usize {
        self.inner.lock().await.connections.len()
    }

    /// Mark the room retired if it has no live connections.
    ///
    /// Called by the registry with the registry lock held. A `join` racing
    /// this call either registered first (the room stays live) or observes
    /// the retired flag and retries against a fresh instance.
    pub(crate) async fn retire_if_empty(&self) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.connections.is_empty() {
            inner.retired = true;
            true
        } else {
            false
        }
    }
}
