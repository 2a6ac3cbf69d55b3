//! Anthropic provider backend.
//!
//! Uses the Anthropic messages API.
//!
//! ```no_run
//! # use docent_models::ProviderRegistry;
//! # use docent_model_providers::anthropic::AnthropicAdapter;
//! let mut registry = ProviderRegistry::new();
//! registry.register_provider("anthropic", || AnthropicAdapter);
//! ```

mod provider;
mod types;

pub use provider::{ANTHROPIC_VERSION, AnthropicAdapter};
