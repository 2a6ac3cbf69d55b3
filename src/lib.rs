//! Answers questions about a documentation site using interchangeable LLM backends.
//!
//! Ranked candidate pages are tried in order against one of five vendors
//! (`openai`, `anthropic`, `gemini`, `huggingface`, `ollama`) until a
//! validated answer comes back.

pub use docent_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use docent_internal::prelude::*;
}
