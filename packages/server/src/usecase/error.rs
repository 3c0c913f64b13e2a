//! UseCase 層のエラー定義

use thiserror::Error;

/// Errors related to joining a room
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// The room was retired between the registry lookup and the join; the
    /// caller must fetch a fresh instance from the registry and retry.
    #[error("room has been retired")]
    Retired,
}
