//! # Common Test Utilities
//!
//! `TestApp` spawns a real server on a random port, with the AI provider
//! pointed at an OpenAI-compatible `httpmock` endpoint and the wiki client
//! pointed at the same mock server. Tests script model turns by mounting
//! mocks on `/v1/chat/completions` before issuing requests.

#![allow(unused)]

use anyhow::Result;
use httpmock::MockServer;
use learnmap_server::{
    config::AppConfig,
    router,
    state::{build_app_state, AppState},
};
use reqwest::Client;
use serde_json::json;
use tokio::{net::TcpListener, task::JoinHandle};

pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _server_handle: JoinHandle<()>,
}

impl TestApp {
    /// Spawns the application server and returns a `TestApp` instance.
    pub async fn spawn() -> Result<Self> {
        let mock_server = MockServer::start();
        let config = AppConfig {
            port: 0,
            ai_provider: "local".to_string(),
            ai_api_url: Some(mock_server.url(CHAT_COMPLETIONS_PATH)),
            ai_api_key: None,
            ai_model: "mock-chat-model".to_string(),
            wiki_base_url: mock_server.base_url(),
            cors_allowed_origin: None,
            max_images: 5,
        };
        let app_state = build_app_state(config).await?;
        Self::spawn_with_state(app_state, mock_server).await
    }

    pub async fn spawn_with_state(app_state: AppState, mock_server: MockServer) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let app_state_for_harness = app_state.clone();
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state: app_state_for_harness,
            _server_handle: server_handle,
        })
    }
}

/// An OpenAI-compatible chat completion body wrapping `content`.
pub fn chat_completion(content: &str) -> serde_json::Value {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}
