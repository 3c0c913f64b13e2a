//! Interactive CLI client for the level chat.
//!
//! Connects to a running server, replays the level's recent history and then
//! sends each typed line as a chat message.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin takarabako-client -- --level 3 --username alice
//! ```

use chrono::Local;
use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use takarabako_server::infrastructure::dto::websocket::WireMessage;
use takarabako_shared::logger::setup_logger;

/// Command-line options for the chat client.
#[derive(Debug, Parser)]
#[command(name = "takarabako-client", about = "CLI client for the level chat")]
struct ClientArgs {
    /// Server base URL
    #[arg(long, default_value = "ws://127.0.0.1:8080")]
    server: String,

    /// Level whose chat room to join
    #[arg(long)]
    level: u32,

    /// Display name sent with every message (1-32 characters)
    #[arg(long)]
    username: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = ClientArgs::parse();

    // Same guard the server applies; fail fast instead of having every
    // frame dropped
    let name_len = args.username.chars().count();
    if name_len == 0 || name_len > 32 {
        eprintln!("username must be 1-32 characters (got {name_len})");
        std::process::exit(1);
    }

    let url = format!("{}/level/{}/", args.server, args.level);
    let (ws, _) = match connect_async(url.as_str()).await {
        Ok(connection) => connection,
        Err(e) => {
            eprintln!("Failed to connect to {url}: {e}");
            std::process::exit(1);
        }
    };
    println!(
        "Connected to level {} chat. Type a message and press enter.",
        args.level
    );

    let (mut write, mut read) = ws.split();

    // Print incoming frames: history first, then live traffic
    let mut print_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = read.next().await {
            if let Message::Text(text) = msg {
                match serde_json::from_str::<WireMessage>(&text) {
                    Ok(frame) => {
                        let time = Local::now().format("%H:%M:%S");
                        println!("[{time}] {}: {}", frame.username, frame.message);
                    }
                    Err(e) => tracing::warn!("Unexpected frame from server: {}", e),
                }
            }
        }
    });

    // rustyline is blocking; feed lines through a channel from its own thread
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                eprintln!("Failed to start line editor: {e}");
                return;
            }
        };

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    eprintln!("Input error: {e}");
                    break;
                }
            }
        }
    });

    let username = args.username;
    let mut send_task = tokio::spawn(async move {
        while let Some(line) = line_rx.recv().await {
            let frame = WireMessage {
                username: username.clone(),
                message: line,
            };
            let payload = serde_json::to_string(&frame).unwrap();
            if write.send(Message::Text(payload.into())).await.is_err() {
                eprintln!("Connection to the server was lost");
                break;
            }
        }
    });

    // Either the server closed on us or the local input ended
    tokio::select! {
        _ = &mut print_task => send_task.abort(),
        _ = &mut send_task => print_task.abort(),
    };
}
