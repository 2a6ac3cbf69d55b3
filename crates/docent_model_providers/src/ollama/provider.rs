//! Ollama [`ProviderAdapter`] implementation.

use super::types::{GenerateRequest, GenerateResponse};
use docent_models::adapter::compose_prompt;
use docent_models::{
    AuthScheme, EffectiveConfig, LlmError, ProviderAdapter, ProviderIdentity, RequestPayload,
    ResponseMode,
};
use serde_json::{Map, Value};

/// Runtime options forwarded verbatim when configured.
const OPTION_KEYS: &[&str] = &[
    "top_k",
    "top_p",
    "seed",
    "stop",
    "num_ctx",
    "num_gpu",
    "mirostat",
    "mirostat_eta",
    "mirostat_tau",
];

/// Adapter for a local Ollama server.
#[derive(Debug, Clone, Copy, Default)]
pub struct OllamaAdapter;

impl ProviderAdapter for OllamaAdapter {
    fn identity(&self) -> ProviderIdentity {
        ProviderIdentity::Ollama
    }

    fn auth_scheme(&self) -> AuthScheme {
        AuthScheme::None
    }

    fn build_request_body(
        &self,
        question: &str,
        context: Option<&str>,
        config: &EffectiveConfig,
    ) -> Result<RequestPayload, LlmError> {
        let mut options = Map::new();
        if let Some(temperature) = config.temperature() {
            options.insert("temperature".to_string(), Value::from(temperature));
        }
        if let Some(max_tokens) = config.max_tokens() {
            options.insert("num_predict".to_string(), Value::from(max_tokens));
        }
        config.copy_extras(OPTION_KEYS, &mut options);

        let request = GenerateRequest {
            model: config.require_model()?.to_string(),
            prompt: compose_prompt(question, context),
            system: config.system_message().to_string(),
            stream: config.stream(),
            options,
        };

        RequestPayload::from_request(self.identity(), &request)
    }

    fn response_mode(&self, config: &EffectiveConfig) -> ResponseMode {
        if config.stream() {
            ResponseMode::LineDelimited
        } else {
            ResponseMode::Buffered
        }
    }

    fn parse_response(&self, body: Value) -> Result<String, LlmError> {
        let provider = self.identity();
        // Streamed responses arrive already assembled.
        if let Value::String(text) = body {
            return non_empty(provider, text);
        }

        let response: GenerateResponse = serde_json::from_value(body.clone()).map_err(|err| {
            LlmError::api(provider, format!("unexpected response shape: {err}"))
                .with_body(body.to_string())
        })?;

        if let Some(error) = response.error {
            return Err(LlmError::api(provider, error));
        }
        match response.response {
            Some(text) => non_empty(provider, text),
            None => Err(LlmError::api(provider, "response field missing").with_body(body.to_string())),
        }
    }
}

fn non_empty(provider: ProviderIdentity, text: String) -> Result<String, LlmError> {
    if text.trim().is_empty() {
        Err(LlmError::api(provider, "response was empty"))
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_models::{GenerationOptions, Settings};
    use serde_json::json;
    use std::collections::HashMap;

    fn config(options: &GenerationOptions) -> EffectiveConfig {
        let env: HashMap<String, String> = HashMap::new();
        EffectiveConfig::resolve(ProviderIdentity::Ollama, options, &Settings::builtin(), &env)
            .unwrap()
    }

    #[test]
    fn body_shape() {
        let options = GenerationOptions::default()
            .extra("num_ctx", 4096)
            .extra("seed", 7);
        let body = OllamaAdapter
            .build_request_body("Q?", Some("C."), &config(&options))
            .unwrap()
            .into_json();

        assert_eq!(body["model"], "gemma3:4b");
        assert_eq!(body["prompt"], "C.\n\nQuestion: Q?");
        assert_eq!(body["stream"], false);
        assert_eq!(body["options"]["temperature"], 0.7);
        assert_eq!(body["options"]["num_predict"], 1024);
        assert_eq!(body["options"]["num_ctx"], 4096);
        assert_eq!(body["options"]["seed"], 7);
        assert!(body["options"].get("timeout").is_none());
    }

    #[test]
    fn no_credential_headers() {
        let headers = OllamaAdapter
            .build_headers(&config(&GenerationOptions::default()))
            .unwrap();
        assert_eq!(headers.len(), 1);
        assert!(headers.contains_key("Content-Type"));
    }

    #[test]
    fn stream_flag_selects_line_delimited_mode() {
        let buffered = config(&GenerationOptions::default());
        assert_eq!(OllamaAdapter.response_mode(&buffered), ResponseMode::Buffered);

        let streamed = config(&GenerationOptions::default().stream(true));
        assert_eq!(OllamaAdapter.response_mode(&streamed), ResponseMode::LineDelimited);
        let body = OllamaAdapter
            .build_request_body("Q?", None, &streamed)
            .unwrap()
            .into_json();
        assert_eq!(body["stream"], true);
    }

    #[test]
    fn parses_buffered_and_assembled_bodies() {
        assert_eq!(
            OllamaAdapter
                .parse_response(json!({"model": "gemma3:4b", "response": "Yes.", "done": true}))
                .unwrap(),
            "Yes."
        );
        assert_eq!(
            OllamaAdapter.parse_response(json!("Streamed answer")).unwrap(),
            "Streamed answer"
        );
    }

    #[test]
    fn error_and_missing_response_fail() {
        let err = OllamaAdapter
            .parse_response(json!({"error": "model 'x' not found"}))
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(OllamaAdapter.parse_response(json!({"done": true})).is_err());
        assert!(OllamaAdapter.parse_response(json!({"response": ""})).is_err());
    }
}
