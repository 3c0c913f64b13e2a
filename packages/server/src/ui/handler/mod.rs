//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{debug_rooms, health_check, level_history};

// Re-export WebSocket handlers
pub use websocket::level_chat_handler;
