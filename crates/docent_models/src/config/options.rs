//! Per-call generation overrides.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-supplied overrides for a single generation call.
///
/// Every field is optional. A value present here wins over every table in
/// [`Settings`](crate::Settings). Keys a vendor does not recognize are ignored
/// by that vendor's adapter.
///
/// ```
/// use docent_models::GenerationOptions;
///
/// let options = GenerationOptions::default()
///     .model("gpt-4o-mini")
///     .temperature(0.2)
///     .extra("top_p", 0.9);
///
/// assert_eq!(options.model.as_deref(), Some("gpt-4o-mini"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Registry identifier of the provider to use.
    pub provider: Option<String>,
    /// Endpoint URL (or base URL for the inference-endpoint vendor).
    pub api_url: Option<String>,
    /// Credential.
    pub api_key: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Output length cap in tokens.
    pub max_tokens: Option<u64>,
    /// Request timeout in seconds.
    pub timeout: Option<u64>,
    /// System message replacing the default persona.
    pub system_message: Option<String>,
    /// Requests a streamed response where the vendor supports it.
    #[serde(alias = "stream")]
    pub stream_enabled: Option<bool>,
    /// Vendor-specific keys (`top_p`, `top_k`, penalties, ...).
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

impl GenerationOptions {
    /// Sets the provider identifier.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the endpoint URL.
    #[must_use]
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Sets the credential.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the model name.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the output token cap.
    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the request timeout in seconds.
    #[must_use]
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Replaces the default system persona.
    #[must_use]
    pub fn system_message(mut self, message: impl Into<String>) -> Self {
        self.system_message = Some(message.into());
        self
    }

    /// Enables or disables streamed responses.
    #[must_use]
    pub fn stream(mut self, enabled: bool) -> Self {
        self.stream_enabled = Some(enabled);
        self
    }

    /// Adds a vendor-specific key.
    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Returns the override for a named key, covering both the typed fields and
    /// the extras map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "provider" => self.provider.clone().map(Value::from),
            "api_url" => self.api_url.clone().map(Value::from),
            "api_key" => self.api_key.clone().map(Value::from),
            "model" => self.model.clone().map(Value::from),
            "temperature" => self.temperature.map(Value::from),
            "max_tokens" => self.max_tokens.map(Value::from),
            "timeout" => self.timeout.map(Value::from),
            "system_message" => self.system_message.clone().map(Value::from),
            "stream" | "stream_enabled" => self.stream_enabled.map(Value::from),
            other => self.extras.get(other).filter(|v| !v.is_null()).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_known_keys_and_extras() {
        let options: GenerationOptions = serde_json::from_value(json!({
            "provider": "gemini",
            "temperature": 0.1,
            "stream": true,
            "topK": 40
        }))
        .unwrap();

        assert_eq!(options.provider.as_deref(), Some("gemini"));
        assert_eq!(options.stream_enabled, Some(true));
        assert_eq!(options.get("topK"), Some(json!(40)));
        assert_eq!(options.get("temperature"), Some(json!(0.1)));
    }

    #[test]
    fn null_extras_are_absent() {
        let options = GenerationOptions::default().extra("seed", Value::Null);
        assert_eq!(options.get("seed"), None);
    }
}
