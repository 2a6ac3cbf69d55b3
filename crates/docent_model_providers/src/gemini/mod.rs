//! Google Gemini backend.
//!
//! Uses the `generateContent` endpoint. The model is part of the endpoint URL
//! and the key travels as the `key` query parameter.

mod provider;
mod types;

pub use provider::GeminiAdapter;
