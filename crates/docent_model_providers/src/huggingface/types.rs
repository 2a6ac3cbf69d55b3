//! Hugging Face text-generation task types.
//!
//! See: <https://huggingface.co/docs/api-inference/tasks/text-generation>

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Request Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct TextGenerationRequest {
    pub inputs: String,
    pub parameters: Parameters,
    pub options: InferenceOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct Parameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_new_tokens: Option<u64>,
    pub return_full_text: bool,
    /// Sampling extras such as `top_k` or `repetition_penalty`.
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InferenceOptions {
    pub wait_for_model: bool,
    pub use_cache: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Response Types
// ─────────────────────────────────────────────────────────────────────────────

/// Inference responses come as a list, a single object, or an error.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextGenerationResponse {
    Batch(Vec<GeneratedText>),
    Error(InferenceError),
    Single(GeneratedText),
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedText {
    pub generated_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferenceError {
    pub error: Value,
    #[serde(default)]
    pub estimated_time: Option<f64>,
}
