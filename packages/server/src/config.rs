//! Server configuration parsed from the command line.

use clap::Parser;

/// Command-line configuration for the chat server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "takarabako-server",
    about = "Per-level chat server for the treasure hunt"
)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// SQLite database URL holding the chat message log
    #[arg(long, default_value = "sqlite:takarabako.db?mode=rwc")]
    pub database_url: String,

    /// Highest level number players can reach
    #[arg(long, default_value_t = 15)]
    pub levels: u32,
}
