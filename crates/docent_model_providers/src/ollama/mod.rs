//! Ollama backend.
//!
//! Talks to a local `/api/generate` endpoint without credentials. When
//! streaming is enabled the newline-delimited body is assembled by the
//! executor before parsing.

mod provider;
mod types;

pub use provider::OllamaAdapter;
