//! # Common Test Utilities
//!
//! This module centralizes the test harness used across the `funr-server`
//! integration tests.
//!
//! - `TestApp`: A full application harness that spawns a real server on a random port,
//!   configured with an `httpmock::MockServer` standing in for both the AI provider
//!   and the Apify scraper.

// Allow unused code because this is a test utility module, and not all
// functions might be used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use funr_server::{
    config, router,
    state::build_app_state,
};
use httpmock::MockServer;
use reqwest::Client;
use std::{fs::File, io::Write, net::SocketAddr};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

pub const CHAT_PATH: &str = "/v1/chat/completions";
pub const APIFY_PATH: &str = "/v2/acts/apify~instagram-scraper/run-sync-get-dataset-items";

/// Writes a config file pointing both providers at `mock_server`.
pub fn write_config(dir: &TempDir, mock_server: &MockServer) -> Result<String> {
    let config_path = dir.path().join("config.yml");
    let config_content = format!(
        r#"
port: 0
inference:
  provider: "openai"
  api_url: "{}"
  api_key: "sk-test"
  model_name: "mock-chat-model"
  max_tokens: 50
  timeout_secs: 5
metadata:
  api_url: "{}"
  api_token: "apify-test-token"
  timeout_secs: 5
"#,
        mock_server.url(CHAT_PATH),
        mock_server.url(APIFY_PATH)
    );
    let mut file = File::create(&config_path)?;
    file.write_all(config_content.as_bytes())?;
    Ok(config_path.to_string_lossy().into_owned())
}

// --- Full Application Test Harness ---

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server and returns a `TestApp` instance.
    pub async fn spawn() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start_async().await;
        let config_dir = tempdir()?;
        let config_path = write_config(&config_dir, &mock_server)?;

        let config = config::get_config(Some(&config_path))?;
        let app_state = build_app_state(&config).await?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn webhook_url(&self) -> String {
        format!("{}/api/save-instagram-data", self.address)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
