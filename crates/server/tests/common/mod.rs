//! # Common Test Utilities
//!
//! Centralizes the `TestApp` harness used across the `mealsnap-server`
//! integration tests: a real server spawned on a random port, with every
//! external collaborator (vision model, text model, nutrition service)
//! pointed at a single `httpmock::MockServer`.

#![allow(unused)]

use httpmock::MockServer;
use mealsnap::{
    providers::ai::{gemini::GeminiProvider, local::LocalAiProvider},
    IngredientNormalizer, NutritionClient, RecipeOrchestrator, SynonymMap, VisionOrchestrator,
};
use mealsnap_server::{router::create_router, state::AppState};
use reqwest::Client;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{net::TcpListener, task::JoinHandle};

/// A harness for end-to-end testing of the Axum server.
///
/// The vision orchestrator uses a `GeminiProvider` aimed at the mock
/// server's `/v1beta/generate` path; the recipe orchestrator uses a
/// `LocalAiProvider` aimed at `/v1/chat/completions`; the nutrition client
/// hits the mock server's `/nutrition/estimate`. Tests script all three
/// with `httpmock` expectations.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server and returns a `TestApp` instance.
    pub async fn spawn() -> Self {
        Self::spawn_with_synonyms(SynonymMap::default()).await
    }

    pub async fn spawn_with_synonyms(synonyms: SynonymMap) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start();

        let vision_provider = Box::new(
            GeminiProvider::new(mock_server.url("/v1beta/generate"), "test-key".to_string())
                .expect("Failed to create GeminiProvider"),
        );
        let text_provider = Box::new(
            LocalAiProvider::new(mock_server.url("/v1/chat/completions"), None, None)
                .expect("Failed to create LocalAiProvider"),
        );
        let nutrition = NutritionClient::new(mock_server.base_url())
            .expect("Failed to create NutritionClient");

        let app_state = AppState {
            vision: Arc::new(VisionOrchestrator::new(
                vision_provider,
                None,
                IngredientNormalizer::new(synonyms),
            )),
            recipes: Arc::new(RecipeOrchestrator::new(text_provider, Some(nutrition))),
        };

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let addr: SocketAddr = listener.local_addr().unwrap();
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = create_router(app_state);
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = server.await {
                eprintln!("Server error: {e}");
            }
        });

        Self {
            address,
            client: Client::new(),
            mock_server,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Builds a multipart form carrying one image field.
    pub fn image_form(
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> reqwest::multipart::Form {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .expect("invalid content type in test");
        reqwest::multipart::Form::new().part("image", part)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// A canned Gemini `generateContent` response wrapping the given text.
pub fn gemini_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": text}]}}]
    })
}

/// A canned OpenAI-compatible chat completion wrapping the given text.
pub fn chat_completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
}
