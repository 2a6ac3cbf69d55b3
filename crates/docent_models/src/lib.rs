//! Provider interface, configuration resolution and registry for Docent.
//!
//! Provides the uniform contract every LLM vendor is driven through, decoupling
//! the answer pipeline from vendor request and response shapes.
//!
//! # Overview
//!
//! - [`ProviderAdapter`]: three pure operations per vendor (build the request
//!   body, build the headers, parse the response) plus endpoint and response
//!   mode hooks.
//!
//! - [`config`]: per-call [`GenerationOptions`], static [`Settings`] tables and
//!   the ordered [`ConfigResolver`](config::ConfigResolver) chain producing an
//!   [`EffectiveConfig`].
//!
//! - [`Transport`]: the network seam. The reqwest-backed executor lives in
//!   `docent_model_providers`.
//!
//! - [`ProviderRegistry`]: maps identifiers to adapter constructors.
//!
//! # Example
//!
//! ```ignore
//! use docent_models::{GenerationOptions, ProviderRegistry};
//!
//! let mut registry = ProviderRegistry::new();
//! docent_model_providers::register_builtin(&mut registry);
//!
//! let adapter = registry.create_provider("ollama")?;
//! let options = GenerationOptions::default().model("llama3.1:8b");
//! ```

pub mod adapter;
pub mod config;
pub mod error;
#[cfg(test)]
mod log_capture;
mod provider;
mod registry;
pub mod transport;

#[cfg(feature = "test-utils")]
pub mod testing;

pub use adapter::{AuthScheme, Headers, ProviderAdapter, RequestPayload};
pub use config::{EffectiveConfig, GenerationOptions, Settings};
pub use error::{LlmError, RegistryError, SettingsError};
pub use provider::{ParseProviderError, ProviderIdentity};
pub use registry::{AdapterConstructor, ProviderRegistry};
pub use transport::{HttpMethod, HttpRequest, ResponseMode, Transport, TransportResponse};
