//! WebSocket wire-format frames for the level chat.
//!
//! The same `{"username": ..., "message": ...}` object is used for inbound
//! client frames, outbound live broadcasts, and replayed history. There is no
//! acknowledgment frame and no application-level heartbeat.

use serde::{Deserialize, Serialize};

use crate::domain::ChatMessage;

/// One chat frame as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub username: String,
    pub message: String,
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            username: message.author.as_str().to_string(),
            message: message.content.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LevelNumber, MessageContent, Timestamp, Username};

    #[test]
    fn test_serialize_uses_exact_field_names() {
        // テスト項目: 送信フレームのフィールド名が username / message である
        // given (前提条件):
        let frame = WireMessage {
            username: "alice".to_string(),
            message: "hi".to_string(),
        };

        // when (操作):
        let json: serde_json::Value = serde_json::to_value(&frame).unwrap();

        // then (期待する結果):
        assert_eq!(json["username"], "alice");
        assert_eq!(json["message"], "hi");
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_deserialize_accepts_any_field_order() {
        // テスト項目: 受信フレームはフィールド順に依存せずパースできる
        // when (操作):
        let frame: WireMessage =
            serde_json::from_str(r#"{"message": "hi", "username": "alice"}"#).unwrap();

        // then (期待する結果):
        assert_eq!(frame.username, "alice");
        assert_eq!(frame.message, "hi");
    }

    #[test]
    fn test_deserialize_missing_field_fails() {
        // テスト項目: 2 フィールド構造でないフレームはパースに失敗する
        // when (操作):
        let result = serde_json::from_str::<WireMessage>(r#"{"message": "hi"}"#);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_from_chat_message() {
        // テスト項目: ドメインのメッセージからワイヤフレームへ変換できる
        // given (前提条件):
        let message = ChatMessage::new(
            LevelNumber::new(3).unwrap(),
            Username::new("alice".to_string()).unwrap(),
            MessageContent::new("over here".to_string()).unwrap(),
            Timestamp::new(1000),
        );

        // when (操作):
        let frame = WireMessage::from(&message);

        // then (期待する結果):
        assert_eq!(frame.username, "alice");
        assert_eq!(frame.message, "over here");
    }
}
