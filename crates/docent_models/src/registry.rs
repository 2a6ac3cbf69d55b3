//! Provider adapter registry.

use crate::adapter::ProviderAdapter;
use crate::error::RegistryError;
use std::collections::HashMap;
use std::sync::Arc;

/// Creates a fresh adapter instance.
pub type AdapterConstructor = Arc<dyn Fn() -> Arc<dyn ProviderAdapter> + Send + Sync>;

/// Maps lower-cased provider identifiers to adapter constructors.
///
/// # Lifecycle
///
/// The registry is the only process-wide mutable state. It is populated during
/// startup while it is exclusively owned (`&mut`), then shared read-only,
/// typically behind an [`Arc`]. Registration and lookup are not synchronized.
///
/// ```
/// # use docent_models::{ProviderRegistry, ProviderAdapter, ProviderIdentity, AuthScheme};
/// # use docent_models::{EffectiveConfig, LlmError, RequestPayload};
/// # use serde_json::{json, Value};
/// # struct EchoAdapter;
/// # impl ProviderAdapter for EchoAdapter {
/// #     fn identity(&self) -> ProviderIdentity { ProviderIdentity::Ollama }
/// #     fn auth_scheme(&self) -> AuthScheme { AuthScheme::None }
/// #     fn build_request_body(&self, q: &str, _c: Option<&str>, _cfg: &EffectiveConfig)
/// #         -> Result<RequestPayload, LlmError> { Ok(json!({ "prompt": q }).into()) }
/// #     fn parse_response(&self, body: Value) -> Result<String, LlmError> { Ok(body.to_string()) }
/// # }
/// let mut registry = ProviderRegistry::new();
/// registry.register_provider("Echo", || EchoAdapter);
///
/// let adapter = registry.create_provider("echo").unwrap();
/// assert_eq!(adapter.identity(), ProviderIdentity::Ollama);
/// assert!(registry.create_provider("missing").is_err());
/// ```
#[derive(Default)]
pub struct ProviderRegistry {
    constructors: HashMap<String, AdapterConstructor>,
}

impl core::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Registers an adapter constructor under `name` (case-insensitive).
    ///
    /// An existing registration with the same name is replaced and a warning
    /// is logged.
    pub fn register_provider<F, A>(&mut self, name: impl AsRef<str>, constructor: F)
    where
        F: Fn() -> A + Send + Sync + 'static,
        A: ProviderAdapter,
    {
        let name = name.as_ref().trim().to_lowercase();
        let constructor: AdapterConstructor =
            Arc::new(move || Arc::new(constructor()) as Arc<dyn ProviderAdapter>);

        if self.constructors.insert(name.clone(), constructor).is_some() {
            tracing::warn!(provider = %name, "provider already registered; overwriting");
        } else {
            tracing::debug!(provider = %name, "registered provider");
        }
    }

    /// Creates an adapter for `name` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownProvider`] listing the registered
    /// identifiers if `name` is not registered.
    pub fn create_provider(
        &self,
        name: impl AsRef<str>,
    ) -> Result<Arc<dyn ProviderAdapter>, RegistryError> {
        let name = name.as_ref().trim().to_lowercase();
        match self.constructors.get(&name) {
            Some(constructor) => {
                tracing::info!(provider = %name, "using LLM provider");
                Ok(constructor())
            }
            None => {
                let available = self.provider_names();
                tracing::error!(provider = %name, ?available, "unknown LLM provider");
                Err(RegistryError::UnknownProvider { name, available })
            }
        }
    }

    /// Checks if a provider is registered.
    #[must_use]
    pub fn has_provider(&self, name: impl AsRef<str>) -> bool {
        self.constructors
            .contains_key(&name.as_ref().trim().to_lowercase())
    }

    /// Lists registered identifiers, sorted.
    #[must_use]
    pub fn provider_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.constructors.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{AuthScheme, RequestPayload};
    use crate::config::EffectiveConfig;
    use crate::error::LlmError;
    use crate::provider::ProviderIdentity;
    use serde_json::{Value, json};

    struct FixedAdapter(ProviderIdentity);

    impl ProviderAdapter for FixedAdapter {
        fn identity(&self) -> ProviderIdentity {
            self.0
        }

        fn auth_scheme(&self) -> AuthScheme {
            AuthScheme::None
        }

        fn build_request_body(
            &self,
            question: &str,
            _context: Option<&str>,
            _config: &EffectiveConfig,
        ) -> Result<RequestPayload, LlmError> {
            Ok(json!({ "q": question }).into())
        }

        fn parse_response(&self, body: Value) -> Result<String, LlmError> {
            Ok(body.to_string())
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut registry = ProviderRegistry::new();
        registry.register_provider("OpenAI", || FixedAdapter(ProviderIdentity::OpenAi));

        assert!(registry.has_provider("openai"));
        assert!(registry.has_provider("OPENAI"));
        let adapter = registry.create_provider(" OpenAi ").unwrap();
        assert_eq!(adapter.identity(), ProviderIdentity::OpenAi);
    }

    #[test]
    fn registration_overwrites() {
        let mut registry = ProviderRegistry::new();
        registry.register_provider("local", || FixedAdapter(ProviderIdentity::Ollama));
        registry.register_provider("local", || FixedAdapter(ProviderIdentity::HuggingFace));

        assert_eq!(registry.provider_names(), vec!["local".to_string()]);
        let adapter = registry.create_provider("local").unwrap();
        assert_eq!(adapter.identity(), ProviderIdentity::HuggingFace);
    }

    #[test]
    fn unknown_provider_enumerates_registered() {
        let mut registry = ProviderRegistry::new();
        registry.register_provider("openai", || FixedAdapter(ProviderIdentity::OpenAi));
        registry.register_provider("gemini", || FixedAdapter(ProviderIdentity::Gemini));

        let Err(RegistryError::UnknownProvider { name, available }) =
            registry.create_provider("Mistral")
        else {
            panic!("expected unknown provider error");
        };
        assert_eq!(name, "mistral");
        assert_eq!(available, vec!["gemini".to_string(), "openai".to_string()]);
    }

    #[test]
    fn each_lookup_builds_a_fresh_adapter() {
        let mut registry = ProviderRegistry::new();
        registry.register_provider("openai", || FixedAdapter(ProviderIdentity::OpenAi));

        let a = registry.create_provider("openai").unwrap();
        let b = registry.create_provider("openai").unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
