//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Username validation error
    #[error("Username cannot be empty")]
    UsernameEmpty,

    /// Username too long error
    #[error("Username cannot exceed {max} characters (got {actual})")]
    UsernameTooLong { max: usize, actual: usize },

    /// MessageContent validation error
    #[error("MessageContent cannot be empty")]
    MessageContentEmpty,

    /// LevelNumber validation error
    #[error("LevelNumber must be positive")]
    LevelNumberZero,
}

/// Errors raised by the message store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backing store failed or rejected the operation
    #[error("message store unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be mapped back to a domain message
    #[error("stored message is corrupt: {0}")]
    Corrupt(String),
}
