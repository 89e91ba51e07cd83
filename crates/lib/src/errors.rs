use thiserror::Error;

/// Custom error types for the orchestration library.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Request to AI provider failed: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    /// The model call succeeded but no JSON value could be recovered from
    /// its text, even after the repair pass. Both the original text and the
    /// repaired candidate are kept so callers can surface them for
    /// diagnosis.
    #[error("Model returned invalid JSON")]
    InvalidModelJson { raw: String, repaired: String },
    #[error("API key is missing")]
    MissingApiKey,
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}
