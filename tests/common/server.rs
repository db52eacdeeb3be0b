//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own database and its own fake
//! Gutendex.

use super::constants::*;
use super::fake_gutendex::spawn_fake_gutendex;
use book_catalog_server::gutendex::{GutendexClient, DEFAULT_USER_AGENT};
use book_catalog_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use book_catalog_server::{CatalogService, SqliteCatalogStore};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated database
///
/// When dropped, the server and the fake Gutendex shut down and the temp
/// directory is removed.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// Books endpoint of the fake Gutendex the server talks to
    pub gutendex_url: String,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    _gutendex_shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port
    ///
    /// # Panics
    ///
    /// Panics if the database cannot be created, a port cannot be bound or
    /// the server doesn't become ready within timeout.
    pub async fn spawn() -> Self {
        let (gutendex_shutdown_tx, gutendex_shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let gutendex_url = spawn_fake_gutendex(gutendex_shutdown_rx).await;

        let temp_db_dir = TempDir::new().expect("Failed to create temp dir");
        let catalog_store = Arc::new(
            SqliteCatalogStore::new(temp_db_dir.path().join("catalog.db"))
                .expect("Failed to open catalog store"),
        );
        let gutendex = Arc::new(
            GutendexClient::new(&gutendex_url, GUTENDEX_TIMEOUT_SECS, DEFAULT_USER_AGENT)
                .expect("Failed to create Gutendex client"),
        );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
        };
        let app = make_app(config, CatalogService::new(catalog_store, gutendex));

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            gutendex_url,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
            _gutendex_shutdown_tx: Some(gutendex_shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(tx) = self._gutendex_shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
