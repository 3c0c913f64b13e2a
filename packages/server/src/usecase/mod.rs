//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod error;
pub mod registry;
pub mod room;

pub use error::JoinError;
pub use registry::RoomRegistry;
pub use room::{HISTORY_LIMIT, Room};
