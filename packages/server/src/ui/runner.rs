//! Server runner: builds the router and serves it until shutdown.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    domain::{LevelCatalog, MessageStore},
    infrastructure::{catalog::FixedLevelCatalog, repository::SqliteMessageStore},
    ui::{
        handler::{debug_rooms, health_check, level_chat_handler, level_history},
        signal,
        state::AppState,
    },
    usecase::RoomRegistry,
};

/// Run the chat server until it receives a shutdown signal.
///
/// # Errors
///
/// Returns an error if the message store cannot be opened or the listener
/// cannot bind.
pub async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store: Arc<dyn MessageStore> =
        Arc::new(SqliteMessageStore::connect(&config.database_url).await?);
    let catalog: Arc<dyn LevelCatalog> = Arc::new(FixedLevelCatalog::new(config.levels));
    let registry = Arc::new(RoomRegistry::new(store.clone()));

    let state = Arc::new(AppState {
        store,
        catalog,
        registry,
    });

    let app = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/debug/rooms", get(debug_rooms))
        .route("/level/{level}/", get(level_chat_handler))
        .route("/level/{level}/history", get(level_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(signal::shutdown_signal())
        .await?;

    Ok(())
}
