//! Hugging Face [`ProviderAdapter`] implementation.

use super::types::{InferenceOptions, Parameters, TextGenerationRequest, TextGenerationResponse};
use docent_models::adapter::compose_prompt;
use docent_models::{
    AuthScheme, EffectiveConfig, LlmError, ProviderAdapter, ProviderIdentity, RequestPayload,
};
use serde_json::{Map, Value};

/// The inference API rejects a zero temperature.
const MIN_TEMPERATURE: f64 = 0.01;

const EXTRA_KEYS: &[&str] = &[
    "top_k",
    "top_p",
    "repetition_penalty",
    "max_time",
    "num_return_sequences",
];

/// Adapter for the Hugging Face Inference API.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuggingFaceAdapter;

impl ProviderAdapter for HuggingFaceAdapter {
    fn identity(&self) -> ProviderIdentity {
        ProviderIdentity::HuggingFace
    }

    fn auth_scheme(&self) -> AuthScheme {
        AuthScheme::Bearer
    }

    fn endpoint(&self, config: &EffectiveConfig) -> Result<String, LlmError> {
        let base = config.endpoint().trim_end_matches('/');
        if base.is_empty() {
            return Err(LlmError::configuration(
                "no api_url configured for provider 'huggingface'",
            ));
        }
        let model = config.require_model()?.trim_matches('/');
        Ok(format!("{base}/{model}"))
    }

    fn build_request_body(
        &self,
        question: &str,
        context: Option<&str>,
        config: &EffectiveConfig,
    ) -> Result<RequestPayload, LlmError> {
        let mut extras = Map::new();
        config.copy_extras(EXTRA_KEYS, &mut extras);

        let request = TextGenerationRequest {
            inputs: format!(
                "{}\n\n{}",
                config.system_message(),
                compose_prompt(question, context)
            ),
            parameters: Parameters {
                temperature: config.temperature().map(|t| t.max(MIN_TEMPERATURE)),
                max_new_tokens: config.max_tokens(),
                return_full_text: false,
                extras,
            },
            options: InferenceOptions {
                wait_for_model: config.extra_bool("wait_for_model").unwrap_or(true),
                use_cache: config.extra_bool("use_cache").unwrap_or(true),
            },
        };

        RequestPayload::from_request(self.identity(), &request)
    }

    fn parse_response(&self, body: Value) -> Result<String, LlmError> {
        let provider = self.identity();
        let response: TextGenerationResponse =
            serde_json::from_value(body.clone()).map_err(|err| {
                LlmError::api(provider, format!("unexpected response shape: {err}"))
                    .with_body(body.to_string())
            })?;

        let text = match response {
            TextGenerationResponse::Batch(items) => items
                .into_iter()
                .next()
                .map(|item| item.generated_text)
                .unwrap_or_default(),
            TextGenerationResponse::Single(item) => item.generated_text,
            TextGenerationResponse::Error(error) => {
                let detail = match error.error {
                    Value::String(message) => message,
                    other => other.to_string(),
                };
                let message = match error.estimated_time {
                    Some(seconds) => {
                        format!("{detail} (model is loading, estimated time {seconds:.0}s)")
                    }
                    None => detail,
                };
                return Err(LlmError::api(provider, message));
            }
        };

        if text.trim().is_empty() {
            return Err(LlmError::api(provider, "response contained no generated text")
                .with_body(body.to_string()));
        }
        Ok(text)
    }
}
