//! Gemini [`ProviderAdapter`] implementation.

use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, RequestPart,
};
use docent_models::adapter::compose_prompt;
use docent_models::{
    AuthScheme, EffectiveConfig, LlmError, ProviderAdapter, ProviderIdentity, RequestPayload,
};
use serde_json::Value;

/// Adapter for the Gemini `generateContent` API.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiAdapter;

impl ProviderAdapter for GeminiAdapter {
    fn identity(&self) -> ProviderIdentity {
        ProviderIdentity::Gemini
    }

    fn auth_scheme(&self) -> AuthScheme {
        AuthScheme::QueryParam("key")
    }

    fn build_request_body(
        &self,
        question: &str,
        context: Option<&str>,
        config: &EffectiveConfig,
    ) -> Result<RequestPayload, LlmError> {
        let generation_config = GenerationConfig {
            temperature: config.temperature(),
            max_output_tokens: config.max_tokens().map(|tokens| tokens.max(1)),
            top_p: config
                .extra_f64("topP")
                .or_else(|| config.extra_f64("top_p")),
            top_k: config
                .extra_u64("topK")
                .or_else(|| config.extra_u64("top_k")),
            candidate_count: config
                .extra_u64("candidateCount")
                .or_else(|| config.extra_u64("candidate_count")),
        };

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![RequestPart {
                    text: compose_prompt(question, context),
                }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![RequestPart {
                    text: config.system_message().to_string(),
                }],
            },
            generation_config,
        };

        RequestPayload::from_request(self.identity(), &request)
    }

    fn parse_response(&self, body: Value) -> Result<String, LlmError> {
        let provider = self.identity();
        let response: GenerateContentResponse =
            serde_json::from_value(body.clone()).map_err(|err| {
                LlmError::api(provider, format!("unexpected response shape: {err}"))
                    .with_body(body.to_string())
            })?;

        if let Some(error) = response.error {
            let message = match error.status {
                Some(status) => format!("{status}: {}", error.message),
                None => error.message,
            };
            let err = LlmError::api(provider, message);
            return Err(match error.code {
                Some(code) => err.with_status(code),
                None => err,
            });
        }

        if let Some(reason) = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
        {
            return Err(LlmError::api(
                provider,
                format!("prompt was blocked: {reason}"),
            ));
        }

        let Some(candidate) = response.candidates.into_iter().next() else {
            return Err(
                LlmError::api(provider, "response contained no candidates")
                    .with_body(body.to_string()),
            );
        };

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if !text.trim().is_empty() {
            return Ok(text);
        }

        match candidate.finish_reason.as_deref() {
            Some("SAFETY") => Err(LlmError::api(
                provider,
                format!(
                    "response blocked for safety: {}",
                    Value::Array(candidate.safety_ratings)
                ),
            )),
            Some(reason) => Err(LlmError::api(
                provider,
                format!("response contained no text (finish reason {reason})"),
            )),
            None => Err(LlmError::api(provider, "response contained no text")
                .with_body(body.to_string())),
        }
    }
}
