//! Server state shared across handlers.

use std::sync::Arc;

use crate::{
    domain::{LevelCatalog, MessageStore},
    usecase::RoomRegistry,
};

/// Shared application state
pub struct AppState {
    /// Message store, read directly by the bootstrap history endpoint
    pub store: Arc<dyn MessageStore>,
    /// Validates level numbers against the level data
    pub catalog: Arc<dyn LevelCatalog>,
    /// Active rooms, shared with every connection handler
    pub registry: Arc<RoomRegistry>,
}
