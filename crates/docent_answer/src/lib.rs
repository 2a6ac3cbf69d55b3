//! Answer generation for Docent.
//!
//! Turns a question plus ranked candidate pages into a single answer.
//!
//! # Overview
//!
//! - [`AnswerGenerator`]: one provider, one request per call. Resolves the
//!   effective configuration, builds the vendor payload, executes it through a
//!   [`Transport`](docent_models::Transport) and parses the answer.
//!
//! - [`AnswerValidator`]: rejects short answers and refusal phrasing.
//!
//! - [`CandidateController`]: tries up to [`MAX_CANDIDATE_ATTEMPTS`] candidates
//!   in rank order and returns the first valid answer, recording every attempt
//!   in the [`AnswerResult`].
//!
//! - [`Ranking`]: the similarity-search output, converted into
//!   [`CandidateContext`] values.
//!
//! # Example
//!
//! ```no_run
//! use docent_answer::{CandidateContext, CandidateController};
//! use docent_model_providers::{HttpExecutor, builtin_registry};
//! use docent_models::{GenerationOptions, Settings};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), docent_models::RegistryError> {
//! let controller = CandidateController::new(
//!     Arc::new(builtin_registry()),
//!     Arc::new(HttpExecutor::new()),
//!     Arc::new(Settings::builtin()),
//! );
//! let candidates = vec![CandidateContext::new(
//!     "https://docs.example.com/install",
//!     "Run the installer and restart.",
//!     0.82,
//!     0,
//! )];
//! let result = controller
//!     .try_candidates("How do I install it?", &candidates, "ollama", &GenerationOptions::default())
//!     .await?;
//! println!("{}", result.answer());
//! # Ok(())
//! # }
//! ```

mod candidates;
mod controller;
mod generator;
mod validator;

pub use candidates::{CandidateContext, ContextSource, PageRecord, Ranking};
pub use controller::{
    AnswerResult, Attempt, AttemptOutcome, CandidateController, GENERIC_ERROR_MESSAGE,
    MAX_CANDIDATE_ATTEMPTS, NOT_FOUND_ANSWER,
};
pub use generator::{AnswerGenerator, GenerationStage};
pub use validator::{AnswerValidator, MIN_ANSWER_LENGTH, is_valid, strip_validity_marker};
