//! `OpenAI` [`ProviderAdapter`] implementation.

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Role};
use docent_models::{
    AuthScheme, EffectiveConfig, LlmError, ProviderAdapter, ProviderIdentity, RequestPayload,
};
use serde_json::{Map, Value};

/// Sampling extras forwarded verbatim when configured.
const EXTRA_KEYS: &[&str] = &["top_p", "frequency_penalty", "presence_penalty", "seed"];

/// Adapter for the `OpenAI` chat completions API.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiAdapter;

impl ProviderAdapter for OpenAiAdapter {
    fn identity(&self) -> ProviderIdentity {
        ProviderIdentity::OpenAi
    }

    fn auth_scheme(&self) -> AuthScheme {
        AuthScheme::Bearer
    }

    fn build_request_body(
        &self,
        question: &str,
        context: Option<&str>,
        config: &EffectiveConfig,
    ) -> Result<RequestPayload, LlmError> {
        let mut extras = Map::new();
        config.copy_extras(EXTRA_KEYS, &mut extras);

        let request = ChatCompletionRequest {
            model: config.require_model()?.to_string(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: config.system_message().to_string(),
                },
                ChatMessage {
                    role: Role::User,
                    content: user_content(question, context),
                },
            ],
            temperature: config.temperature(),
            max_tokens: config.max_tokens(),
            extras,
        };

        RequestPayload::from_request(self.identity(), &request)
    }

    fn parse_response(&self, body: Value) -> Result<String, LlmError> {
        let provider = self.identity();
        let response: ChatCompletionResponse = serde_json::from_value(body.clone())
            .map_err(|err| {
                LlmError::api(provider, format!("unexpected response shape: {err}"))
                    .with_body(body.to_string())
            })?;

        if let Some(error) = response.error {
            return Err(LlmError::api(provider, error.message).with_body(body.to_string()));
        }

        let Some(choice) = response.choices.into_iter().next() else {
            return Err(
                LlmError::api(provider, "response contained no choices").with_body(body.to_string())
            );
        };

        if let Some(refusal) = choice.message.refusal.filter(|r| !r.trim().is_empty()) {
            return Err(LlmError::api(provider, format!("model refused: {refusal}")));
        }
        if choice.finish_reason.as_deref() == Some("content_filter") {
            return Err(LlmError::api(provider, "response blocked by content filter"));
        }

        match choice.message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(LlmError::api(provider, "response contained no answer text")
                .with_body(body.to_string())),
        }
    }
}

fn user_content(question: &str, context: Option<&str>) -> String {
    match context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(context) => format!("Context:\n{context}\n\nQuestion: {question}"),
        None => question.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_models::{GenerationOptions, Settings};
    use serde_json::json;
    use std::collections::HashMap;

    fn config(options: &GenerationOptions) -> EffectiveConfig {
        let env = HashMap::from([("OPENAI_API_KEY".to_string(), "sk-test".to_string())]);
        EffectiveConfig::resolve(ProviderIdentity::OpenAi, options, &Settings::builtin(), &env)
            .unwrap()
    }

    #[test]
    fn body_carries_system_and_context() {
        let options = GenerationOptions::default()
            .temperature(0.2)
            .extra("top_p", 0.9)
            .extra("unrelated", 1);
        let body = OpenAiAdapter
            .build_request_body("Who?", Some("Docs here."), &config(&options))
            .unwrap()
            .into_json();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(
            body["messages"][1]["content"],
            "Context:\nDocs here.\n\nQuestion: Who?"
        );
        assert_eq!(body["temperature"], 0.2);
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["top_p"], 0.9);
        assert!(body.get("unrelated").is_none());
    }

    #[test]
    fn empty_context_sends_bare_question() {
        let body = OpenAiAdapter
            .build_request_body("Who?", Some("  "), &config(&GenerationOptions::default()))
            .unwrap()
            .into_json();
        assert_eq!(body["messages"][1]["content"], "Who?");
    }

    #[test]
    fn bearer_header_is_set() {
        let headers = OpenAiAdapter
            .build_headers(&config(&GenerationOptions::default()))
            .unwrap();
        assert_eq!(headers["Authorization"], "Bearer sk-test");
    }

    #[test]
    fn parses_first_choice() {
        let answer = OpenAiAdapter
            .parse_response(json!({
                "choices": [{"message": {"role": "assistant", "content": "Paris."}, "finish_reason": "stop"}]
            }))
            .unwrap();
        assert_eq!(answer, "Paris.");
    }

    #[test]
    fn vendor_error_object_fails() {
        let err = OpenAiAdapter
            .parse_response(json!({"error": {"message": "Invalid API key", "type": "invalid_request_error"}}))
            .unwrap_err();
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[test]
    fn refusal_and_filter_fail() {
        let refusal = json!({"choices": [{"message": {"content": null, "refusal": "I can't help"}}]});
        assert!(OpenAiAdapter.parse_response(refusal).is_err());

        let filtered = json!({"choices": [{"message": {"content": ""}, "finish_reason": "content_filter"}]});
        let err = OpenAiAdapter.parse_response(filtered).unwrap_err();
        assert!(err.to_string().contains("content filter"));
    }

    #[test]
    fn empty_shapes_fail() {
        assert!(OpenAiAdapter.parse_response(json!({"choices": []})).is_err());
        assert!(OpenAiAdapter.parse_response(json!({})).is_err());
        assert!(
            OpenAiAdapter
                .parse_response(json!({"choices": [{"message": {"content": "   "}}]}))
                .is_err()
        );
    }
}
