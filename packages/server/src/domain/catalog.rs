//! Level catalog trait: the seam to the level-data collaborator.

use async_trait::async_trait;

use super::value_object::LevelNumber;

/// Answers whether a level number corresponds to a real, reachable level.
///
/// The chat gateway rejects handshakes for levels the catalog does not
/// contain, before any room interaction takes place.
#[async_trait]
pub trait LevelCatalog: Send + Sync {
    /// Whether `level` exists and is currently accessible.
    async fn contains(&self, level: LevelNumber) -> bool;
}
