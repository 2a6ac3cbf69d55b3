//! `OpenAI` chat completions backend.
//!
//! ```no_run
//! # use docent_models::ProviderRegistry;
//! # use docent_model_providers::openai::OpenAiAdapter;
//! let mut registry = ProviderRegistry::new();
//! registry.register_provider("openai", || OpenAiAdapter);
//! ```

mod provider;
mod types;

pub use provider::OpenAiAdapter;
