//! Core domain models for the level chat subsystem.

use serde::{Deserialize, Serialize};

use super::value_object::{LevelNumber, MessageContent, Timestamp, Username};

/// A chat message accepted into a level's room.
///
/// Messages are immutable once created: the subsystem appends and replays
/// them, never edits or deletes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Level whose room the message belongs to
    pub level: LevelNumber,
    /// Client-supplied display name of the sender
    pub author: Username,
    /// Message content
    pub content: MessageContent,
    /// Server-assigned timestamp used for ordering
    pub created_at: Timestamp,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(
        level: LevelNumber,
        author: Username,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Self {
        Self {
            level,
            author,
            content,
            created_at,
        }
    }
}
