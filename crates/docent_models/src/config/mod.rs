//! Configuration: per-call overrides, static tables and the resolver chain.
//!
//! Values are resolved per provider, first match wins:
//!
//! 1. the caller's [`GenerationOptions`],
//! 2. the provider-specific table ([`Settings::provider_params`]),
//! 3. the kind-specific tables (endpoint, credential, model),
//! 4. the general defaults ([`Settings::params`]),
//! 5. a fallback supplied by the caller of the resolver.
//!
//! See [`ConfigResolver`] for the chain itself and [`EffectiveConfig`] for the
//! fully resolved bag used by one request.

mod effective;
mod options;
mod resolver;
mod settings;

pub use effective::{DEFAULT_TIMEOUT_SECS, EffectiveConfig};
pub use options::GenerationOptions;
pub use resolver::{
    ConfigKind, ConfigResolver, EnvSource, ProcessEnv, RESOLUTION_ORDER, ResolutionLayer,
};
pub use settings::{DEFAULT_SYSTEM_MESSAGE, GeneralParams, Settings};
