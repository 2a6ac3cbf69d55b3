//! Static configuration tables.

use crate::error::SettingsError;
use crate::provider::ProviderIdentity;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

/// Default system persona sent when the caller does not supply one.
pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are a helpful assistant answering questions about \
developer documentation. Answer directly, without phrases such as 'in this document'. Use the \
HTML pages you are given to build your answer. If there is not enough information to answer, \
start your answer with 'FALSE -'. If the information is sufficient, start it with 'TRUE -'.";

/// General generation defaults shared by all providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralParams {
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Output token cap.
    pub max_tokens: Option<u64>,
    /// Request timeout in seconds.
    pub timeout: Option<u64>,
}

impl Default for GeneralParams {
    fn default() -> Self {
        Self {
            temperature: Some(0.7),
            max_tokens: Some(1024),
            timeout: Some(60),
        }
    }
}

/// Static configuration tables consulted by the
/// [`ConfigResolver`](crate::config::ConfigResolver).
///
/// [`Settings::builtin`] ships working endpoints and default models for every
/// vendor. A JSON file loaded with [`Settings::from_path`] is overlaid on top
/// of the built-ins, table by table.
///
/// ```json
/// {
///   "default_provider": "ollama",
///   "models": { "ollama": "llama3.1:8b" },
///   "params": { "temperature": 0.2 },
///   "provider_params": { "ollama": { "stream": true, "num_ctx": 8192 } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Provider used when the caller does not name one.
    pub default_provider: String,
    /// Endpoint URL per provider.
    pub api_urls: HashMap<ProviderIdentity, String>,
    /// Statically configured credential per provider.
    pub api_keys: HashMap<ProviderIdentity, String>,
    /// Default model per provider.
    pub models: HashMap<ProviderIdentity, String>,
    /// General defaults.
    pub params: GeneralParams,
    /// Provider-specific values for any key, standard or vendor-specific.
    pub provider_params: HashMap<ProviderIdentity, Map<String, Value>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Settings {
    /// Creates settings with no tables populated and no general defaults.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            default_provider: ProviderIdentity::OpenAi.to_string(),
            api_urls: HashMap::new(),
            api_keys: HashMap::new(),
            models: HashMap::new(),
            params: GeneralParams {
                temperature: None,
                max_tokens: None,
                timeout: None,
            },
            provider_params: HashMap::new(),
        }
    }

    /// Creates the built-in settings.
    #[must_use]
    pub fn builtin() -> Self {
        use ProviderIdentity::{Anthropic, Gemini, HuggingFace, OpenAi, Ollama};

        let api_urls = HashMap::from([
            (OpenAi, "https://api.openai.com/v1/chat/completions".to_string()),
            (Anthropic, "https://api.anthropic.com/v1/messages".to_string()),
            (
                Gemini,
                "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
                    .to_string(),
            ),
            (
                HuggingFace,
                "https://api-inference.huggingface.co/models".to_string(),
            ),
            (Ollama, "http://localhost:11434/api/generate".to_string()),
        ]);

        let models = HashMap::from([
            (OpenAi, "gpt-4o-mini".to_string()),
            (Anthropic, "claude-sonnet-4-5-20250929".to_string()),
            (HuggingFace, "mistralai/Mistral-7B-Instruct-v0.3".to_string()),
            (Ollama, "gemma3:4b".to_string()),
        ]);

        let mut ollama = Map::new();
        ollama.insert("timeout".to_string(), Value::from(150));
        ollama.insert("stream".to_string(), Value::from(false));

        Self {
            default_provider: OpenAi.to_string(),
            api_urls,
            api_keys: HashMap::new(),
            models,
            params: GeneralParams::default(),
            provider_params: HashMap::from([(Ollama, ollama)]),
        }
    }

    /// Parses settings from JSON and overlays them onto [`Settings::builtin`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Json`] if the document does not match the schema.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let overlay: SettingsOverlay = serde_json::from_str(json)?;
        let mut settings = Self::builtin();
        settings.apply(overlay);
        Ok(settings)
    }

    /// Reads a JSON settings file and overlays it onto [`Settings::builtin`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Looks up a provider-specific value.
    #[must_use]
    pub fn provider_param(&self, provider: ProviderIdentity, key: &str) -> Option<&Value> {
        self.provider_params
            .get(&provider)
            .and_then(|table| table.get(key))
            .filter(|value| !value.is_null())
    }

    fn apply(&mut self, overlay: SettingsOverlay) {
        if let Some(provider) = overlay.default_provider {
            self.default_provider = provider;
        }
        self.api_urls.extend(overlay.api_urls);
        self.api_keys.extend(overlay.api_keys);
        self.models.extend(overlay.models);
        if let Some(params) = overlay.params {
            self.params.temperature = params.temperature.or(self.params.temperature);
            self.params.max_tokens = params.max_tokens.or(self.params.max_tokens);
            self.params.timeout = params.timeout.or(self.params.timeout);
        }
        for (provider, table) in overlay.provider_params {
            self.provider_params.entry(provider).or_default().extend(table);
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsOverlay {
    default_provider: Option<String>,
    api_urls: HashMap<ProviderIdentity, String>,
    api_keys: HashMap<ProviderIdentity, String>,
    models: HashMap<ProviderIdentity, String>,
    params: Option<PartialParams>,
    provider_params: HashMap<ProviderIdentity, Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialParams {
    temperature: Option<f64>,
    max_tokens: Option<u64>,
    timeout: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_endpoint() {
        let settings = Settings::builtin();
        for id in ProviderIdentity::ALL {
            assert!(settings.api_urls.contains_key(&id), "missing endpoint for {id}");
        }
        assert!(!settings.models.contains_key(&ProviderIdentity::Gemini));
    }

    #[test]
    fn overlay_keeps_untouched_builtins() {
        let settings = Settings::from_json(
            r#"{
                "default_provider": "ollama",
                "models": { "ollama": "llama3.1:8b" },
                "params": { "temperature": 0.2 },
                "provider_params": { "ollama": { "stream": true } }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.default_provider, "ollama");
        assert_eq!(settings.models[&ProviderIdentity::Ollama], "llama3.1:8b");
        assert_eq!(settings.models[&ProviderIdentity::OpenAi], "gpt-4o-mini");
        assert_eq!(settings.params.temperature, Some(0.2));
        assert_eq!(settings.params.max_tokens, Some(1024));
        assert_eq!(
            settings.provider_param(ProviderIdentity::Ollama, "stream"),
            Some(&Value::Bool(true))
        );
        assert_eq!(
            settings.provider_param(ProviderIdentity::Ollama, "timeout"),
            Some(&Value::from(150))
        );
    }

    #[test]
    fn rejects_unknown_provider_keys() {
        let err = Settings::from_json(r#"{ "models": { "mistral": "large" } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Settings::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }
}
