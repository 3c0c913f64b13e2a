//! WebSocket connection handlers.
//!
//! One connection = one read task + one write task. The read task parses
//! inbound frames and dispatches into the room's serialized operations; the
//! write task drains the connection's channel into the socket. History is
//! written before the write task starts draining, so replay always precedes
//! live traffic.

use std::sync::Arc;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionIdFactory, LevelNumber, MessageContent, Username},
    infrastructure::dto::websocket::WireMessage,
    ui::state::AppState,
};

/// Upgrade handler for `/level/{level}/`.
///
/// Rejects unknown levels before the upgrade; the client sees a closed
/// connection and no room is ever touched.
pub async fn level_chat_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(level): Path<u32>,
) -> Result<impl IntoResponse, StatusCode> {
    let level = match LevelNumber::new(level) {
        Ok(level) => level,
        Err(_) => {
            tracing::warn!("Rejected chat handshake for level 0");
            return Err(StatusCode::NOT_FOUND);
        }
    };

    if !state.catalog.contains(level).await {
        tracing::warn!("Rejected chat handshake for unknown level {}", level);
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, level)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, level: LevelNumber) {
    let (mut sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive broadcasts
    let (tx, mut rx) = mpsc::unbounded_channel();
    let connection_id = ConnectionIdFactory::generate();

    let (room, history) = state.registry.join(level, connection_id, tx).await;
    tracing::info!("Connection '{}' joined level {}", connection_id, level);

    // Replay stored history before any live traffic reaches the socket
    for message in &history {
        let json = serde_json::to_string(&WireMessage::from(message)).unwrap();
        if sender.send(Message::Text(json.into())).await.is_err() {
            tracing::warn!("Connection '{}' dropped during history replay", connection_id);
            room.leave(&connection_id).await;
            state.registry.retire_if_empty(level).await;
            return;
        }
    }

    let room_recv = room.clone();

    // Read loop: parse inbound frames and dispatch into the room
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on connection '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let frame = match serde_json::from_str::<WireMessage>(&text) {
                        Ok(frame) => frame,
                        Err(e) => {
                            tracing::warn!("Failed to parse frame as JSON: {}", e);
                            continue;
                        }
                    };

                    let author = match Username::new(frame.username) {
                        Ok(author) => author,
                        Err(e) => {
                            tracing::warn!("Dropping frame with invalid username: {}", e);
                            continue;
                        }
                    };
                    let content = match MessageContent::new(frame.message) {
                        Ok(content) => content,
                        Err(e) => {
                            tracing::warn!("Dropping frame with invalid content: {}", e);
                            continue;
                        }
                    };

                    // Fire-and-forget from the client's perspective: a storage
                    // failure drops the frame and is only recorded here
                    if let Err(e) = room_recv.receive(author, content).await {
                        tracing::error!("Failed to persist message on level {}: {}", level, e);
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                Message::Ping(_) => {
                    // Ping/pong is handled by the WebSocket layer
                    tracing::debug!("Received ping");
                }
                _ => {}
            }
        }
    });

    // Write loop: forward broadcasts from the room to this connection
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // If either task completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Closure is reported exactly once, whatever ended the session
    room.leave(&connection_id).await;
    state.registry.retire_if_empty(level).await;
    tracing::info!("Connection '{}' left level {}", connection_id, level);
}
