//! Ollama generate API types.
//!
//! See: <https://github.com/ollama/ollama/blob/main/docs/api.md>

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body for `/api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub system: String,
    pub stream: bool,
    /// Runtime options such as `temperature` and `num_predict`.
    pub options: Map<String, Value>,
}

/// Buffered response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateResponse {
    pub response: Option<String>,
    pub error: Option<String>,
}
