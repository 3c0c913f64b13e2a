//! Shared utilities for the Takarabako packages.
//!
//! Logging setup and timestamp helpers used by both the chat server and the
//! CLI client.

pub mod logger;
pub mod time;
