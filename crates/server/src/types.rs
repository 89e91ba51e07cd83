//! Shared request/response wrapper types for the API surface.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query parameters controlling per-request debug output. Appending
/// `?debug=true` to an endpoint that supports it (currently
/// `/vision/ingredients`) adds a `debug` block to the response.
#[derive(Debug, Deserialize, Default)]
pub struct DebugParams {
    pub debug: Option<bool>,
}

/// The standard envelope for endpoints that support debug output: the
/// payload under `result`, plus an optional `debug` object with upload
/// metadata (filename, content type, byte count). The `debug` key is
/// omitted entirely unless the caller asked for it.
#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
    pub result: T,
}
