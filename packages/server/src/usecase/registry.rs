//! UseCase: ルームレジストリ
//!
//! プロセス内で唯一の「レベル番号 → アクティブなルーム」のマップ。
//! ルームは最初の join で遅延生成され、接続が空になったときに回収されます。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - get_or_create() の単一インスタンス保証
//! - retire_if_empty() の空チェックと join との競合の解消
//! - リタイア後の join が新しいルームに到達すること
//!
//! ### なぜこのテストが必要か
//! - レジストリは「ルームが存在する ⇔ 接続がある」という不変条件を守る唯一の場所
//! - check-then-act の競合はここでしか防げない
//!
//! ### どのような状況を想定しているか
//! - 正常系: 遅延生成、空ルームの回収
//! - 異常系: リタイアと join の競合
//! - エッジケース: 存在しないレベルの retire_if_empty

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, mpsc::UnboundedSender};

use crate::domain::{ChatMessage, ConnectionId, LevelNumber, MessageStore};

use super::{error::JoinError, room::Room};

/// Process-wide map of active rooms, keyed by level number.
///
/// Constructed once at startup and injected into the gateway. The registry
/// lock and each room's critical section together guarantee that a room is
/// present in the map iff it has at least one live connection (or is in the
/// brief window before its first join registers).
pub struct RoomRegistry {
    store: Arc<dyn MessageStore>,
    rooms: Mutex<HashMap<LevelNumber, Arc<Room>>>,
}

impl RoomRegistry {
    /// Create an empty registry whose rooms share `store`.
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self {
            store,
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Return the room for `level`, creating and registering it if absent.
    ///
    /// Concurrent callers for the same level receive the same instance.
    pub async fn get_or_create(&self, level: LevelNumber) -> Arc<Room> {
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(level)
            .or_insert_with(|| Arc::new(Room::new(level, self.store.clone())))
            .clone()
    }

    /// Register a connection with the room for `level` and return the room
    /// together with the history to replay.
    ///
    /// Retries when the looked-up room is retired between the map lookup and
    /// the join, so the caller always ends up in a registered room.
    pub async fn join(
        &self,
        level: LevelNumber,
        connection_id: ConnectionId,
        sender: UnboundedSender<String>,
    ) -> (Arc<Room>, Vec<ChatMessage>) {
        loop {
            let room = self.get_or_create(level).await;
            match room.join(connection_id, sender.clone()).await {
                Ok(history) => return (room, history),
                Err(JoinError::Retired) => continue,
            }
        }
    }

    /// Remove the room for `level` if its live set is empty.
    ///
    /// The emptiness check runs under both the registry lock and the room's
    /// own lock. A join racing the removal either keeps the room alive or
    /// retries against the replacement instance; a connection is never left
    /// in an unregistered room.
    pub async fn retire_if_empty(&self, level: LevelNumber) {
        let mut rooms = self.rooms.lock().await;
        let Some(room) = rooms.get(&level).cloned() else {
            return;
        };

        if room.retire_if_empty().await {
            rooms.remove(&level);
            tracing::debug!("Retired empty room for level {}", level);
        }
    }

    /// Levels that currently have an active room, in ascending order.
    pub async fn active_levels(&self) -> Vec<u32> {
        let rooms = self.rooms.lock().await;
        let mut levels: Vec<u32> = rooms.keys().map(|level| level.value()).collect();
        levels.sort_unstable();
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionIdFactory, MessageContent, Username},
        infrastructure::repository::InMemoryMessageStore,
    };
    use tokio::sync::mpsc;

    fn level(number: u32) -> LevelNumber {
        LevelNumber::new(number).unwrap()
    }

    fn create_test_registry() -> (RoomRegistry, Arc<InMemoryMessageStore>) {
        let store = Arc::new(InMemoryMessageStore::new());
        (RoomRegistry::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_get_or_create_returns_same_instance() {
        // テスト項目: 同じレベルに対して同じルームインスタンスが返される
        // given (前提条件):
        let (registry, _store) = create_test_registry();

        // when (操作):
        let room1 = registry.get_or_create(level(3)).await;
        let room2 = registry.get_or_create(level(3)).await;

        // then (期待する結果):
        assert!(Arc::ptr_eq(&room1, &room2));
    }

    #[tokio::test]
    async fn test_get_or_create_concurrent_single_winner() {
        // テスト項目: 同時の get_or_create でも 1 つのルームしか作られない
        // given (前提条件):
        let (registry, _store) = create_test_registry();
        let registry = Arc::new(registry);

        // when (操作): 2 つのタスクが同時に同じレベルを要求
        let r1 = registry.clone();
        let r2 = registry.clone();
        let (room1, room2) = tokio::join!(
            tokio::spawn(async move { r1.get_or_create(level(4)).await }),
            tokio::spawn(async move { r2.get_or_create(level(4)).await }),
        );

        // then (期待する結果): 負けた側も勝った側のインスタンスを受け取る
        assert!(Arc::ptr_eq(&room1.unwrap(), &room2.unwrap()));
    }

    #[tokio::test]
    async fn test_get_or_create_distinct_levels() {
        // テスト項目: 異なるレベルには別々のルームが作られる
        // given (前提条件):
        let (registry, _store) = create_test_registry();

        // when (操作):
        let room1 = registry.get_or_create(level(1)).await;
        let room2 = registry.get_or_create(level(2)).await;

        // then (期待する結果):
        assert!(!Arc::ptr_eq(&room1, &room2));
        assert_eq!(registry.active_levels().await, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_retire_if_empty_removes_empty_room() {
        // テスト項目: 空のルームが retire_if_empty で回収される
        // given (前提条件):
        let (registry, _store) = create_test_registry();
        registry.get_or_create(level(5)).await;

        // when (操作):
        registry.retire_if_empty(level(5)).await;

        // then (期待する結果):
        assert!(registry.active_levels().await.is_empty());
    }

    #[tokio::test]
    async fn test_retire_if_empty_keeps_room_with_connections() {
        // テスト項目: 接続が残っているルームは回収されない
        // given (前提条件):
        let (registry, _store) = create_test_registry();
        let (tx, _rx) = mpsc::unbounded_channel();
        registry.join(level(5), ConnectionIdFactory::generate(), tx).await;

        // when (操作):
        registry.retire_if_empty(level(5)).await;

        // then (期待する結果):
        assert_eq!(registry.active_levels().await, vec![5]);
    }

    #[tokio::test]
    async fn test_retire_if_empty_unknown_level_is_noop() {
        // テスト項目: 存在しないレベルの retire_if_empty は何もしない
        // given (前提条件):
        let (registry, _store) = create_test_registry();

        // when (操作):
        registry.retire_if_empty(level(9)).await;

        // then (期待する結果):
        assert!(registry.active_levels().await.is_empty());
    }

    #[tokio::test]
    async fn test_join_after_retirement_yields_fresh_room_with_history() {
        // テスト項目: 回収後の join は新しいルームに到達し、履歴はストアから配信される
        // given (前提条件): メッセージを 1 件受理した後、全員退出してルームが回収済み
        let (registry, _store) = create_test_registry();
        let (tx, _rx) = mpsc::unbounded_channel();
        let connection_id = ConnectionIdFactory::generate();
        let (room, _history) = registry.join(level(7), connection_id, tx).await;
        room.receive(
            Username::new("alice".to_string()).unwrap(),
            MessageContent::new("hi".to_string()).unwrap(),
        )
        .await
        .unwrap();
        room.leave(&connection_id).await;
        registry.retire_if_empty(level(7)).await;
        assert!(registry.active_levels().await.is_empty());

        // when (操作):
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let (fresh, history) = registry.join(level(7), ConnectionIdFactory::generate(), tx2).await;

        // then (期待する結果): 新しいインスタンスで、履歴は引き継がれている
        assert!(!Arc::ptr_eq(&room, &fresh));
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content.as_str(), "hi");
        assert_eq!(registry.active_levels().await, vec![7]);
    }

    #[tokio::test]
    async fn test_join_retries_past_retired_room() {
        // テスト項目: リタイア済みインスタンスを掴んだ join が新しいルームで成功する
        // given (前提条件): ルームを取得した後にレジストリが回収済み
        let (registry, _store) = create_test_registry();
        let stale = registry.get_or_create(level(2)).await;
        registry.retire_if_empty(level(2)).await;

        // when (操作): 古いインスタンスへの join は失敗し、レジストリ経由では成功する
        let (tx, _rx) = mpsc::unbounded_channel();
        let stale_join = stale.join(ConnectionIdFactory::generate(), tx.clone()).await;
        let (fresh, _history) = registry.join(level(2), ConnectionIdFactory::generate(), tx).await;

        // then (期待する結果):
        assert_eq!(stale_join, Err(JoinError::Retired));
        assert!(!Arc::ptr_eq(&stale, &fresh));
        assert_eq!(fresh.connection_count().await, 1);
    }
}
