//! The fully resolved configuration for one request.

use super::options::GenerationOptions;
use super::resolver::{ConfigKind, ConfigResolver, EnvSource, as_f64, as_u64};
use super::settings::{DEFAULT_SYSTEM_MESSAGE, Settings};
use crate::error::LlmError;
use crate::provider::ProviderIdentity;
use core::time::Duration;
use serde_json::{Map, Value};

/// Timeout applied when no layer configures one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Read-only parameters for a single generation call.
///
/// Built fresh for every call by [`EffectiveConfig::resolve`] and never
/// mutated afterwards. Construction fails if a mandatory value is absent.
#[derive(Clone)]
pub struct EffectiveConfig {
    provider: ProviderIdentity,
    endpoint: String,
    credential: Option<String>,
    model: Option<String>,
    temperature: Option<f64>,
    max_tokens: Option<u64>,
    timeout: Duration,
    system_message: String,
    stream: bool,
    extras: Map<String, Value>,
}

impl EffectiveConfig {
    /// Resolves every parameter for `provider`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Configuration`] if the endpoint, the credential
    /// (unless the provider is credential-exempt) or the model (unless the
    /// provider carries it in the endpoint) is missing, or if a value has the
    /// wrong type.
    pub fn resolve(
        provider: ProviderIdentity,
        overrides: &GenerationOptions,
        settings: &Settings,
        env: &dyn EnvSource,
    ) -> Result<Self, LlmError> {
        let resolver = ConfigResolver::new(provider, overrides, settings, env);
        Self::from_resolver(&resolver, overrides, settings)
    }

    fn from_resolver(
        resolver: &ConfigResolver<'_>,
        overrides: &GenerationOptions,
        settings: &Settings,
    ) -> Result<Self, LlmError> {
        let provider = resolver.provider();

        let endpoint = resolver
            .string(ConfigKind::EndpointUrl)?
            .ok_or_else(|| missing(provider, ConfigKind::EndpointUrl))?;
        let credential = resolver.string(ConfigKind::Credential)?;
        let model = resolver.string(ConfigKind::ModelName)?;
        if let Some(model) = model.as_deref().filter(|_| provider.model_in_endpoint()) {
            tracing::debug!(
                provider = %provider,
                model,
                "model is part of the endpoint URL; configured model is not sent"
            );
        }
        let temperature = resolver.float(ConfigKind::Temperature)?;
        let max_tokens = resolver.unsigned(ConfigKind::MaxTokens)?;
        let timeout = resolver
            .unsigned(ConfigKind::Timeout)?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let system_message = resolver
            .string(ConfigKind::SystemMessage)?
            .unwrap_or_else(|| DEFAULT_SYSTEM_MESSAGE.to_string());
        let stream = resolver.boolean(ConfigKind::Stream)?.unwrap_or(false);

        // Provider table first so caller extras overwrite it.
        let mut extras = settings
            .provider_params
            .get(&provider)
            .cloned()
            .unwrap_or_default();
        extras.extend(overrides.extras.clone());
        extras.retain(|_, value| !value.is_null());

        Ok(Self {
            provider,
            endpoint,
            credential,
            model,
            temperature,
            max_tokens,
            timeout: Duration::from_secs(timeout),
            system_message,
            stream,
            extras,
        })
    }

    /// Provider these values were resolved for.
    #[must_use]
    pub fn provider(&self) -> ProviderIdentity {
        self.provider
    }

    /// Resolved endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Resolved credential.
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// Resolved model name.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Resolved model name, failing if absent.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Configuration`] if no model was resolved.
    pub fn require_model(&self) -> Result<&str, LlmError> {
        self.model()
            .ok_or_else(|| missing(self.provider, ConfigKind::ModelName))
    }

    /// Resolved sampling temperature.
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    /// Resolved output token cap.
    #[must_use]
    pub fn max_tokens(&self) -> Option<u64> {
        self.max_tokens
    }

    /// Resolved request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// System message: the caller's, or the default persona.
    #[must_use]
    pub fn system_message(&self) -> &str {
        &self.system_message
    }

    /// Whether a streamed response was requested.
    #[must_use]
    pub fn stream(&self) -> bool {
        self.stream
    }

    /// Returns a vendor-specific value.
    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    /// Returns a vendor-specific value as a float.
    #[must_use]
    pub fn extra_f64(&self, key: &str) -> Option<f64> {
        self.extra(key).and_then(as_f64)
    }

    /// Returns a vendor-specific value as a non-negative integer.
    #[must_use]
    pub fn extra_u64(&self, key: &str) -> Option<u64> {
        self.extra(key).and_then(as_u64)
    }

    /// Returns a vendor-specific value as a boolean.
    #[must_use]
    pub fn extra_bool(&self, key: &str) -> Option<bool> {
        match self.extra(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Copies every present key of `keys` into `target`.
    pub fn copy_extras(&self, keys: &[&str], target: &mut Map<String, Value>) {
        for key in keys {
            if let Some(value) = self.extra(key) {
                target.insert((*key).to_string(), value.clone());
            }
        }
    }
}

fn missing(provider: ProviderIdentity, kind: ConfigKind<'_>) -> LlmError {
    LlmError::configuration(format!(
        "no {} configured for provider '{provider}'",
        kind.key()
    ))
}

impl core::fmt::Debug for EffectiveConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EffectiveConfig")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("credential", &self.credential.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("stream", &self.stream)
            .field("extras", &self.extras)
            .finish_non_exhaustive()
    }
}
