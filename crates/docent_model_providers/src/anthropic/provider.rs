//! Anthropic [`ProviderAdapter`] implementation.

use super::types::{
    ContentBlock, CreateMessageRequest, MessageParam, MessageResponse, Role, TextBlockParam,
};
use docent_models::adapter::{auth_headers, compose_prompt};
use docent_models::{
    AuthScheme, EffectiveConfig, Headers, LlmError, ProviderAdapter, ProviderIdentity,
    RequestPayload,
};
use serde_json::{Map, Value};

/// API version sent with every request.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default maximum tokens when none is configured.
const DEFAULT_MAX_TOKENS: u64 = 1024;

/// Upper bound on the sampling temperature accepted by the API.
const MAX_TEMPERATURE: f64 = 1.0;

const EXTRA_KEYS: &[&str] = &["top_p", "top_k"];

/// Adapter for the Anthropic messages API.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicAdapter;

impl ProviderAdapter for AnthropicAdapter {
    fn identity(&self) -> ProviderIdentity {
        ProviderIdentity::Anthropic
    }

    fn auth_scheme(&self) -> AuthScheme {
        AuthScheme::Header("x-api-key")
    }

    fn build_request_body(
        &self,
        question: &str,
        context: Option<&str>,
        config: &EffectiveConfig,
    ) -> Result<RequestPayload, LlmError> {
        let mut extras = Map::new();
        config.copy_extras(EXTRA_KEYS, &mut extras);

        let request = CreateMessageRequest {
            model: config.require_model()?.to_string(),
            max_tokens: config.max_tokens().unwrap_or(DEFAULT_MAX_TOKENS).max(1),
            messages: vec![MessageParam {
                role: Role::User,
                content: vec![TextBlockParam {
                    text: compose_prompt(question, context),
                }],
            }],
            system: config.system_message().to_string(),
            temperature: config.temperature().map(|t| t.min(MAX_TEMPERATURE)),
            extras,
        };

        RequestPayload::from_request(self.identity(), &request)
    }

    fn build_headers(&self, config: &EffectiveConfig) -> Result<Headers, LlmError> {
        let mut headers = auth_headers(self.auth_scheme(), config);
        headers.insert(
            "anthropic-version".to_string(),
            ANTHROPIC_VERSION.to_string(),
        );
        Ok(headers)
    }

    fn parse_response(&self, body: Value) -> Result<String, LlmError> {
        let provider = self.identity();
        let response: MessageResponse = serde_json::from_value(body.clone()).map_err(|err| {
            LlmError::api(provider, format!("unexpected response shape: {err}"))
                .with_body(body.to_string())
        })?;

        let message = match response {
            MessageResponse::Message(message) => message,
            MessageResponse::Error { error } => {
                return Err(LlmError::api(
                    provider,
                    format!("{}: {}", error.kind, error.message),
                ));
            }
        };

        let text = message
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        if !text.trim().is_empty() {
            return Ok(text);
        }
        if message.stop_reason.as_deref() == Some("refusal") {
            return Err(LlmError::api(provider, "model refused to answer"));
        }
        Err(LlmError::api(provider, "response contained no text content").with_body(body.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_models::{GenerationOptions, Settings};
    use serde_json::json;
    use std::collections::HashMap;

    fn config(options: &GenerationOptions) -> EffectiveConfig {
        let env = HashMap::from([("ANTHROPIC_API_KEY".to_string(), "ak-test".to_string())]);
        EffectiveConfig::resolve(
            ProviderIdentity::Anthropic,
            options,
            &Settings::builtin(),
            &env,
        )
        .unwrap()
    }

    #[test]
    fn body_uses_system_field_and_text_blocks() {
        let options = GenerationOptions::default()
            .temperature(1.7)
            .extra("top_k", 40);
        let body = AnthropicAdapter
            .build_request_body("Why?", Some("Because."), &config(&options))
            .unwrap()
            .into_json();

        assert_eq!(body["model"], "claude-sonnet-4-5-20250929");
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["temperature"], 1.0);
        assert_eq!(body["top_k"], 40);
        assert!(body["system"].as_str().unwrap().contains("FALSE -"));
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"][0]["type"], "text");
        assert_eq!(
            body["messages"][0]["content"][0]["text"],
            "Because.\n\nQuestion: Why?"
        );
    }

    #[test]
    fn zero_max_tokens_is_clamped() {
        let options = GenerationOptions::default().max_tokens(0);
        let body = AnthropicAdapter
            .build_request_body("Why?", None, &config(&options))
            .unwrap()
            .into_json();
        assert_eq!(body["max_tokens"], 1);
    }

    #[test]
    fn headers_carry_key_and_version() {
        let headers = AnthropicAdapter
            .build_headers(&config(&GenerationOptions::default()))
            .unwrap();
        assert_eq!(headers["x-api-key"], "ak-test");
        assert_eq!(headers["anthropic-version"], ANTHROPIC_VERSION);
        assert!(!headers.contains_key("Authorization"));
    }

    #[test]
    fn joins_text_blocks() {
        let answer = AnthropicAdapter
            .parse_response(json!({
                "type": "message",
                "content": [
                    {"type": "text", "text": "Hello, "},
                    {"type": "thinking", "thinking": "..."},
                    {"type": "text", "text": "world."}
                ],
                "stop_reason": "end_turn"
            }))
            .unwrap();
        assert_eq!(answer, "Hello, world.");
    }

    #[test]
    fn error_envelope_fails() {
        let err = AnthropicAdapter
            .parse_response(json!({
                "type": "error",
                "error": {"type": "overloaded_error", "message": "Overloaded"}
            }))
            .unwrap_err();
        assert!(err.to_string().contains("overloaded_error: Overloaded"));
    }

    #[test]
    fn refusal_and_empty_content_fail() {
        let refusal = json!({"type": "message", "content": [], "stop_reason": "refusal"});
        assert!(
            AnthropicAdapter
                .parse_response(refusal)
                .unwrap_err()
                .to_string()
                .contains("refused")
        );
        assert!(
            AnthropicAdapter
                .parse_response(json!({"type": "message", "content": []}))
                .is_err()
        );
        assert!(AnthropicAdapter.parse_response(json!({"content": []})).is_err());
    }
}
