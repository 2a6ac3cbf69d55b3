//! LLM vendor adapters and the HTTP executor for Docent.
//!
//! Each vendor is packaged as a [`ProviderAdapter`](docent_models::ProviderAdapter)
//! behind a feature flag. [`register_builtin`] adds every enabled adapter to a
//! [`ProviderRegistry`] under its canonical identifier.
//!
//! # Supported Providers
//!
//! | Provider | Identifier | Feature Flag | Credential |
//! |----------|------------|--------------|------------|
//! | `OpenAI` | `openai` | `openai` (default) | `Authorization: Bearer` |
//! | Anthropic | `anthropic` | `anthropic` (default) | `x-api-key` header |
//! | Google Gemini | `gemini` | `gemini` (default) | `key` query parameter |
//! | Hugging Face | `huggingface` | `huggingface` (default) | `Authorization: Bearer` |
//! | Ollama | `ollama` | `ollama` (default) | none |
//!
//! # Feature Flags
//!
//! ```toml
//! # Every provider (default)
//! docent_model_providers = { path = "../docent_model_providers" }
//!
//! # Only a local Ollama server
//! docent_model_providers = { path = "../docent_model_providers", default-features = false, features = ["ollama"] }
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use docent_model_providers::{HttpExecutor, builtin_registry};
//!
//! let registry = builtin_registry();
//! let adapter = registry.create_provider("ollama")?;
//! let transport = HttpExecutor::new();
//! # Ok::<(), docent_models::RegistryError>(())
//! ```

mod executor;
mod stream;

pub use executor::HttpExecutor;
pub use stream::{LineDelimitedAssembler, assemble_line_delimited};

use docent_models::ProviderRegistry;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "openai")]
pub use openai::OpenAiAdapter;

#[cfg(feature = "anthropic")]
pub mod anthropic;

#[cfg(feature = "anthropic")]
pub use anthropic::AnthropicAdapter;

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::GeminiAdapter;

#[cfg(feature = "huggingface")]
pub mod huggingface;

#[cfg(feature = "huggingface")]
pub use huggingface::HuggingFaceAdapter;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::OllamaAdapter;

/// Registers every enabled adapter under its canonical identifier.
pub fn register_builtin(registry: &mut ProviderRegistry) {
    #[cfg(feature = "openai")]
    registry.register_provider("openai", || OpenAiAdapter);
    #[cfg(feature = "anthropic")]
    registry.register_provider("anthropic", || AnthropicAdapter);
    #[cfg(feature = "gemini")]
    registry.register_provider("gemini", || GeminiAdapter);
    #[cfg(feature = "huggingface")]
    registry.register_provider("huggingface", || HuggingFaceAdapter);
    #[cfg(feature = "ollama")]
    registry.register_provider("ollama", || OllamaAdapter);
}

/// Creates a registry holding every enabled adapter.
#[must_use]
pub fn builtin_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    register_builtin(&mut registry);
    registry
}

#[cfg(all(
    test,
    feature = "openai",
    feature = "anthropic",
    feature = "gemini",
    feature = "huggingface",
    feature = "ollama"
))]
mod tests {
    use super::*;
    use docent_models::ProviderIdentity;

    #[test]
    fn builtin_registry_covers_every_identity() {
        let registry = builtin_registry();
        assert_eq!(
            registry.provider_names(),
            vec!["anthropic", "gemini", "huggingface", "ollama", "openai"]
        );
        for identity in ProviderIdentity::ALL {
            let adapter = registry.create_provider(identity.as_str()).unwrap();
            assert_eq!(adapter.identity(), identity);
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = builtin_registry();
        let adapter = registry.create_provider(" OpenAI ").unwrap();
        assert_eq!(adapter.identity(), ProviderIdentity::OpenAi);
    }
}
