//! Hugging Face Inference API backend.
//!
//! The endpoint is the configured base URL with the model appended as a path
//! segment.

mod provider;
mod types;

pub use provider::HuggingFaceAdapter;
