//! Per-level real-time chat for the Takarabako treasure hunt.
//!
//! Players viewing the same level exchange messages through a WebSocket room
//! scoped to that level. Recent history is replayed on join, and every live
//! viewer sees every accepted message exactly once, in persistence order.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry point
pub use ui::run;
