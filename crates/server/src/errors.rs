use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mealsnap::OrchestratorError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within
/// the server, allowing them to be converted into appropriate HTTP
/// responses.
pub enum AppError {
    /// Invalid client input (bad/missing image, wrong content type).
    BadRequest(String),
    /// Errors originating from the `mealsnap` orchestration library.
    Orchestrator(OrchestratorError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<OrchestratorError> for AppError {
    fn from(err: OrchestratorError) -> Self {
        AppError::Orchestrator(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            AppError::Orchestrator(err) => {
                error!("OrchestratorError: {:?}", err);
                match err {
                    // Upstream format failure: carry both texts so the
                    // caller can diagnose what the model produced.
                    OrchestratorError::InvalidModelJson { raw, repaired } => (
                        StatusCode::BAD_GATEWAY,
                        Json(json!({
                            "error": "Model returned invalid JSON",
                            "raw": raw,
                            "repaired": repaired,
                        })),
                    )
                        .into_response(),
                    OrchestratorError::AiRequest(e) => upstream_error(format!(
                        "Request to AI provider failed: {e}"
                    )),
                    OrchestratorError::AiDeserialization(e) => upstream_error(format!(
                        "Failed to deserialize AI provider response: {e}"
                    )),
                    OrchestratorError::AiApi(e) => {
                        upstream_error(format!("AI provider error: {e}"))
                    }
                    OrchestratorError::ReqwestClientBuild(e) => internal_error(format!(
                        "Failed to build HTTP client: {e}"
                    )),
                    OrchestratorError::MissingApiKey => {
                        internal_error("Server is not configured correctly.".to_string())
                    }
                    OrchestratorError::Regex(e) => {
                        internal_error(format!("Internal regex error: {e}"))
                    }
                    OrchestratorError::JsonSerialization(e) => {
                        internal_error(format!("Failed to serialize result: {e}"))
                    }
                }
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "An internal server error occurred." })),
                )
                    .into_response()
            }
        }
    }
}

fn upstream_error(message: String) -> Response {
    (StatusCode::BAD_GATEWAY, Json(json!({ "error": message }))).into_response()
}

fn internal_error(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}
