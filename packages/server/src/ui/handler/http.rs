//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::LevelNumber, infrastructure::dto::websocket::WireMessage, ui::state::AppState,
    usecase::HISTORY_LIMIT,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Debug endpoint listing levels with an active room (for testing purposes)
pub async fn debug_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<u32>> {
    Json(state.registry.active_levels().await)
}

/// Chat history embedded into the level page at render time.
///
/// Reads the message store directly; no live connection is involved. A store
/// failure degrades to an empty history, the same way a join does.
pub async fn level_history(
    State(state): State<Arc<AppState>>,
    Path(level): Path<u32>,
) -> Result<Json<Vec<WireMessage>>, StatusCode> {
    let Ok(level) = LevelNumber::new(level) else {
        return Err(StatusCode::NOT_FOUND);
    };
    if !state.catalog.contains(level).await {
        return Err(StatusCode::NOT_FOUND);
    }

    match state.store.recent(level, HISTORY_LIMIT).await {
        Ok(messages) => Ok(Json(messages.iter().map(WireMessage::from).collect())),
        Err(e) => {
            tracing::error!("Failed to fetch bootstrap history for level {}: {}", level, e);
            Ok(Json(Vec::new()))
        }
    }
}
