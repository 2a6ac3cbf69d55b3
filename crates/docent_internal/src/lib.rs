//! # Docent Internal Library
//!
//! Re-exports the core Docent crates for convenience.

/// Layer 1: provider-agnostic contracts, configuration and registry.
pub use docent_models;

/// Layer 2: vendor adapters and the HTTP executor.
pub use docent_model_providers;

/// Layer 3: answer generation and multi-candidate fallback.
pub use docent_answer;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use docent_answer::{
        AnswerGenerator, AnswerResult, AnswerValidator, AttemptOutcome, CandidateContext,
        CandidateController, Ranking,
    };
    pub use docent_model_providers::{HttpExecutor, builtin_registry};
    pub use docent_models::{
        GenerationOptions, LlmError, ProviderIdentity, ProviderRegistry, Settings,
    };
}
