use crate::{errors::OrchestratorError, providers::ai::TextProvider};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Caps the response size, which also bounds the call's duration.
const MAX_TOKENS: i32 = 800;

// --- Messages-API request and response structures ---

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: i32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Deserialize, Debug)]
struct AnthropicContentBlock {
    #[serde(default)]
    text: String,
}

// --- Anthropic Provider implementation ---

/// A provider for interacting with the Anthropic Messages API.
#[derive(Clone, Debug)]
pub struct AnthropicProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
    model: String,
}

impl AnthropicProvider {
    /// Creates a new `AnthropicProvider`.
    pub fn new(
        api_url: String,
        api_key: String,
        model: String,
    ) -> Result<Self, OrchestratorError> {
        if api_key.is_empty() {
            return Err(OrchestratorError::MissingApiKey);
        }
        let client = ReqwestClient::builder()
            .build()
            .map_err(OrchestratorError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl TextProvider for AnthropicProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, OrchestratorError> {
        let request_body = AnthropicRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: system_prompt,
            messages: vec![AnthropicMessage {
                role: "user",
                content: user_prompt,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request_body)
            .send()
            .await
            .map_err(OrchestratorError::AiRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(OrchestratorError::AiApi(error_text));
        }

        let anthropic_response: AnthropicResponse = response
            .json()
            .await
            .map_err(OrchestratorError::AiDeserialization)?;

        let raw_response = anthropic_response
            .content
            .first()
            .map(|block| block.text.clone())
            .unwrap_or_default();

        Ok(raw_response)
    }
}
