//! Test server fixture shared by the integration tests.

use std::time::Duration;

use takarabako_server::config::ServerConfig;

/// A chat server running on a background task for the duration of a test.
///
/// Each test uses its own port and a fresh database file so tests can run in
/// parallel.
pub struct TestServer {
    port: u16,
}

impl TestServer {
    /// Start a server on `port` with `levels` playable levels and wait until
    /// it accepts connections.
    pub async fn start(port: u16, levels: u32) -> Self {
        let db_path = std::env::temp_dir().join(format!("takarabako-test-{port}.db"));
        // A previous run may have left data behind
        let _ = std::fs::remove_file(&db_path);

        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port,
            database_url: format!("sqlite:{}?mode=rwc", db_path.display()),
            levels,
        };

        tokio::spawn(async move {
            if let Err(e) = takarabako_server::run(config).await {
                panic!("Test server failed: {e}");
            }
        });

        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", port))
                .await
                .is_ok()
            {
                return Self { port };
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        panic!("Test server did not start on port {port}");
    }

    /// Base URL for HTTP requests.
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// WebSocket URL for the given level's chat.
    pub fn ws_url(&self, level: &str) -> String {
        format!("ws://127.0.0.1:{}/level/{}/", self.port, level)
    }
}
