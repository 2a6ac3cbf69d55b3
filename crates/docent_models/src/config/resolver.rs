//! The ordered configuration resolver chain.

use super::options::GenerationOptions;
use super::settings::Settings;
use crate::error::LlmError;
use crate::provider::ProviderIdentity;
use serde_json::Value;
use std::collections::HashMap;

/// Substrings that mark a statically configured credential as an unfilled template.
const PLACEHOLDER_MARKERS: &[&str] = &["your_", "your-", "<", "changeme", "placeholder", "xxxx"];

/// A configuration value that can be resolved for a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind<'a> {
    /// Endpoint URL, or base URL for endpoint-templated vendors.
    EndpointUrl,
    /// API credential.
    Credential,
    /// Model name.
    ModelName,
    /// Sampling temperature.
    Temperature,
    /// Output token cap.
    MaxTokens,
    /// Request timeout in seconds.
    Timeout,
    /// System message.
    SystemMessage,
    /// Streamed response toggle.
    Stream,
    /// Any vendor-specific key.
    Extra(&'a str),
}

impl ConfigKind<'_> {
    /// Key under which this kind appears in overrides and provider tables.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::EndpointUrl => "api_url",
            Self::Credential => "api_key",
            Self::ModelName => "model",
            Self::Temperature => "temperature",
            Self::MaxTokens => "max_tokens",
            Self::Timeout => "timeout",
            Self::SystemMessage => "system_message",
            Self::Stream => "stream",
            Self::Extra(key) => *key,
        }
    }

    /// Whether an absent value is a configuration error for `provider`.
    #[must_use]
    pub fn is_mandatory_for(&self, provider: ProviderIdentity) -> bool {
        match self {
            Self::EndpointUrl => true,
            Self::Credential => provider.requires_credential(),
            Self::ModelName => !provider.model_in_endpoint(),
            _ => false,
        }
    }
}

/// A source consulted by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionLayer {
    /// Caller-supplied override for this call.
    Override,
    /// Provider-specific table keyed by `(provider, kind)`.
    ProviderTable,
    /// Per-kind tables: endpoint, credential (environment first), model.
    KindTable,
    /// General defaults: temperature, max tokens, timeout.
    General,
}

/// The order in which layers are consulted. First match wins.
pub const RESOLUTION_ORDER: [ResolutionLayer; 4] = [
    ResolutionLayer::Override,
    ResolutionLayer::ProviderTable,
    ResolutionLayer::KindTable,
    ResolutionLayer::General,
];

/// Read access to environment variables.
pub trait EnvSource: Send + Sync {
    /// Returns the value of `key`, if set.
    fn var(&self, key: &str) -> Option<String>;
}

/// [`EnvSource`] backed by the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Resolves configuration values for one provider.
///
/// ```
/// use docent_models::config::{ConfigKind, ConfigResolver, GenerationOptions, Settings};
/// use docent_models::ProviderIdentity;
/// use std::collections::HashMap;
///
/// let settings = Settings::builtin();
/// let overrides = GenerationOptions::default().model("gpt-4o");
/// let env = HashMap::new();
///
/// let resolver = ConfigResolver::new(ProviderIdentity::OpenAi, &overrides, &settings, &env);
/// let model = resolver.string(ConfigKind::ModelName).unwrap();
/// assert_eq!(model.as_deref(), Some("gpt-4o"));
/// ```
pub struct ConfigResolver<'a> {
    provider: ProviderIdentity,
    overrides: &'a GenerationOptions,
    settings: &'a Settings,
    env: &'a dyn EnvSource,
}

impl<'a> ConfigResolver<'a> {
    /// Creates a resolver for `provider`.
    #[must_use]
    pub fn new(
        provider: ProviderIdentity,
        overrides: &'a GenerationOptions,
        settings: &'a Settings,
        env: &'a dyn EnvSource,
    ) -> Self {
        Self {
            provider,
            overrides,
            settings,
            env,
        }
    }

    /// The provider values are resolved for.
    #[must_use]
    pub fn provider(&self) -> ProviderIdentity {
        self.provider
    }

    /// Consults a single layer.
    #[must_use]
    pub fn lookup(&self, layer: ResolutionLayer, kind: ConfigKind<'_>) -> Option<Value> {
        let value = match layer {
            ResolutionLayer::Override => self.overrides.get(kind.key()),
            ResolutionLayer::ProviderTable => self
                .settings
                .provider_param(self.provider, kind.key())
                .cloned(),
            ResolutionLayer::KindTable => self.kind_table(kind),
            ResolutionLayer::General => self.general(kind),
        };
        value.filter(is_present)
    }

    /// Walks [`RESOLUTION_ORDER`] and returns the first value found with its layer.
    #[must_use]
    pub fn find(&self, kind: ConfigKind<'_>) -> Option<(ResolutionLayer, Value)> {
        RESOLUTION_ORDER
            .into_iter()
            .find_map(|layer| self.lookup(layer, kind).map(|value| (layer, value)))
    }

    /// Resolves `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Configuration`] if `kind` is mandatory for this
    /// provider and no layer holds a value.
    pub fn resolve(&self, kind: ConfigKind<'_>) -> Result<Option<Value>, LlmError> {
        match self.find(kind) {
            Some((_, value)) => Ok(Some(value)),
            None if kind.is_mandatory_for(self.provider) => Err(LlmError::configuration(format!(
                "no {} configured for provider '{}'",
                kind.key(),
                self.provider
            ))),
            None => Ok(None),
        }
    }

    /// Resolves `kind`, falling back to `default` when no layer holds a value.
    #[must_use]
    pub fn resolve_or(&self, kind: ConfigKind<'_>, default: impl Into<Value>) -> Value {
        self.find(kind)
            .map_or_else(|| default.into(), |(_, value)| value)
    }

    /// Resolves `kind` as a string.
    ///
    /// # Errors
    ///
    /// Fails if the value is mandatory and absent, or is not a string.
    pub fn string(&self, kind: ConfigKind<'_>) -> Result<Option<String>, LlmError> {
        self.resolve(kind)?
            .map(|value| match value {
                Value::String(s) => Ok(s),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(self.type_error(kind, "a string", &other)),
            })
            .transpose()
    }

    /// Resolves `kind` as a float. Numeric strings are accepted.
    ///
    /// # Errors
    ///
    /// Fails if the value is mandatory and absent, or is not numeric.
    pub fn float(&self, kind: ConfigKind<'_>) -> Result<Option<f64>, LlmError> {
        self.resolve(kind)?
            .map(|value| {
                as_f64(&value).ok_or_else(|| self.type_error(kind, "a number", &value))
            })
            .transpose()
    }

    /// Resolves `kind` as a non-negative integer. Numeric strings are accepted.
    ///
    /// # Errors
    ///
    /// Fails if the value is mandatory and absent, or is not a non-negative integer.
    pub fn unsigned(&self, kind: ConfigKind<'_>) -> Result<Option<u64>, LlmError> {
        self.resolve(kind)?
            .map(|value| {
                as_u64(&value)
                    .ok_or_else(|| self.type_error(kind, "a non-negative integer", &value))
            })
            .transpose()
    }

    /// Resolves `kind` as a boolean.
    ///
    /// # Errors
    ///
    /// Fails if the value is mandatory and absent, or is not a boolean.
    pub fn boolean(&self, kind: ConfigKind<'_>) -> Result<Option<bool>, LlmError> {
        self.resolve(kind)?
            .map(|value| match &value {
                Value::Bool(b) => Ok(*b),
                Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
                Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
                _ => Err(self.type_error(kind, "a boolean", &value)),
            })
            .transpose()
    }

    fn kind_table(&self, kind: ConfigKind<'_>) -> Option<Value> {
        match kind {
            ConfigKind::EndpointUrl => self.settings.api_urls.get(&self.provider).cloned(),
            ConfigKind::Credential => self.credential(),
            ConfigKind::ModelName => self.settings.models.get(&self.provider).cloned(),
            _ => None,
        }
        .map(Value::String)
    }

    fn credential(&self) -> Option<String> {
        let env_var = self.provider.credential_env_var();
        if let Some(key) = self.env.var(env_var).filter(|key| !key.trim().is_empty()) {
            return Some(key);
        }

        let key = self.settings.api_keys.get(&self.provider)?;
        if looks_like_placeholder(key) {
            tracing::warn!(
                provider = %self.provider,
                env_var,
                "configured API key looks like a placeholder; set {env_var} or fill in the key"
            );
        }
        Some(key.clone())
    }

    fn general(&self, kind: ConfigKind<'_>) -> Option<Value> {
        let params = &self.settings.params;
        match kind {
            ConfigKind::Temperature => params.temperature.map(Value::from),
            ConfigKind::MaxTokens => params.max_tokens.map(Value::from),
            ConfigKind::Timeout => params.timeout.map(Value::from),
            _ => None,
        }
    }

    fn type_error(&self, kind: ConfigKind<'_>, expected: &str, found: &Value) -> LlmError {
        LlmError::configuration(format!(
            "{} for provider '{}' must be {expected}, found {found}",
            kind.key(),
            self.provider
        ))
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn looks_like_placeholder(key: &str) -> bool {
    let lowered = key.to_ascii_lowercase();
    PLACEHOLDER_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

pub(crate) fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
