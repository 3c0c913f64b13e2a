//! Per-level WebSocket chat server for the treasure hunt.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin takarabako-server
//! ```

use clap::Parser;

use takarabako_server::config::ServerConfig;
use takarabako_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ServerConfig::parse();

    // Run the server
    if let Err(e) = takarabako_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
