//! Multi-candidate fallback.

use crate::candidates::{CandidateContext, ContextSource};
use crate::generator::AnswerGenerator;
use crate::validator::{AnswerValidator, strip_validity_marker};
use docent_models::config::{EnvSource, ProcessEnv};
use docent_models::{GenerationOptions, LlmError, ProviderRegistry, RegistryError, Settings, Transport};
use serde::Serialize;
use std::sync::Arc;

/// At most this many candidates are tried per query.
pub const MAX_CANDIDATE_ATTEMPTS: usize = 3;

/// Answer returned when no candidate produced any answer.
pub const NOT_FOUND_ANSWER: &str = "I couldn't find this.";

/// Message shown to users when answering failed unexpectedly.
pub const GENERIC_ERROR_MESSAGE: &str =
    "Something went wrong while generating the answer. Please try again.";

/// How one candidate attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttemptOutcome {
    /// A valid answer was produced.
    Success,
    /// An answer was produced but failed validation.
    InvalidAnswer,
    /// The request failed or the vendor reported an error.
    TransportError,
    /// A mandatory value could not be resolved.
    ConfigurationError,
}

impl AttemptOutcome {
    /// Kebab-case label used in diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::InvalidAnswer => "invalid-answer",
            Self::TransportError => "transport-error",
            Self::ConfigurationError => "configuration-error",
        }
    }
}

impl core::fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry in the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attempt {
    /// Candidate source URL.
    pub source: String,
    /// Candidate similarity.
    pub similarity: f32,
    /// How the attempt ended.
    pub outcome: AttemptOutcome,
}

/// Result of one top-level query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerResult {
    answer: String,
    source: Option<CandidateContext>,
    valid: bool,
    attempts: Vec<Attempt>,
}

impl AnswerResult {
    /// The not-found sentinel.
    #[must_use]
    pub fn not_found(attempts: Vec<Attempt>) -> Self {
        Self {
            answer: NOT_FOUND_ANSWER.to_string(),
            source: None,
            valid: false,
            attempts,
        }
    }

    /// Answer text: a valid answer, the first invalid one, or [`NOT_FOUND_ANSWER`].
    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Candidate the answer came from.
    #[must_use]
    pub fn source(&self) -> Option<&CandidateContext> {
        self.source.as_ref()
    }

    /// Whether the answer passed validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether any candidate produced an answer.
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.source.is_some()
    }

    /// Every attempt in the order it was made.
    #[must_use]
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }
}

/// Tries ranked candidates until one yields a valid answer.
///
/// Candidates are attempted strictly one after another. A failing candidate
/// never fails the query; only an unknown provider does.
#[derive(Clone)]
pub struct CandidateController {
    registry: Arc<ProviderRegistry>,
    transport: Arc<dyn Transport>,
    settings: Arc<Settings>,
    env: Arc<dyn EnvSource>,
    validator: AnswerValidator,
    context_source: ContextSource,
    max_attempts: usize,
}

impl core::fmt::Debug for CandidateController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CandidateController")
            .field("registry", &self.registry)
            .field("context_source", &self.context_source)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl CandidateController {
    /// Creates a controller reading credentials from the process environment.
    #[must_use]
    pub fn new(
        registry: Arc<ProviderRegistry>,
        transport: Arc<dyn Transport>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            registry,
            transport,
            settings,
            env: Arc::new(ProcessEnv),
            validator: AnswerValidator,
            context_source: ContextSource::Text,
            max_attempts: MAX_CANDIDATE_ATTEMPTS,
        }
    }

    /// Replaces the environment credentials are read from.
    #[must_use]
    pub fn with_env(mut self, env: Arc<dyn EnvSource>) -> Self {
        self.env = env;
        self
    }

    /// Selects which candidate field is sent as context.
    #[must_use]
    pub fn with_context_source(mut self, source: ContextSource) -> Self {
        self.context_source = source;
        self
    }

    /// Lowers the attempt cap. Values above [`MAX_CANDIDATE_ATTEMPTS`] are clamped.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.min(MAX_CANDIDATE_ATTEMPTS);
        self
    }

    /// Answers `question` from the first candidate yielding a valid answer.
    ///
    /// Candidates are tried in the given order, at most
    /// [`MAX_CANDIDATE_ATTEMPTS`] of them. If none is valid, the first invalid
    /// answer is returned; if none produced an answer, the
    /// [not-found sentinel](AnswerResult::not_found). The audit trail lists
    /// every attempt either way.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownProvider`] if `provider` is not registered.
    pub async fn try_candidates(
        &self,
        question: &str,
        candidates: &[CandidateContext],
        provider: &str,
        options: &GenerationOptions,
    ) -> Result<AnswerResult, RegistryError> {
        let generator = AnswerGenerator::from_registry(
            &self.registry,
            provider,
            self.transport.clone(),
            self.settings.clone(),
        )?
        .with_env(self.env.clone());

        let mut attempts = Vec::new();
        let mut fallback: Option<(String, &CandidateContext)> = None;

        for candidate in candidates.iter().take(self.max_attempts) {
            let context = candidate.context(self.context_source);
            let outcome = match generator
                .generate_answer(question, Some(context), options)
                .await
            {
                Ok(answer) if self.validator.is_valid(&answer) => {
                    tracing::info!(
                        source = %candidate.source,
                        similarity = candidate.similarity,
                        "accepted answer"
                    );
                    attempts.push(Attempt::new(candidate, AttemptOutcome::Success));
                    return Ok(AnswerResult {
                        answer: strip_validity_marker(&answer).to_string(),
                        source: Some(candidate.clone()),
                        valid: true,
                        attempts,
                    });
                }
                Ok(answer) => {
                    tracing::warn!(
                        source = %candidate.source,
                        similarity = candidate.similarity,
                        "answer failed validation"
                    );
                    if fallback.is_none() {
                        fallback = Some((answer, candidate));
                    }
                    AttemptOutcome::InvalidAnswer
                }
                Err(err) => {
                    tracing::warn!(
                        source = %candidate.source,
                        similarity = candidate.similarity,
                        error = %err,
                        "candidate attempt failed"
                    );
                    match err {
                        LlmError::Configuration(_) => AttemptOutcome::ConfigurationError,
                        LlmError::Api { .. } => AttemptOutcome::TransportError,
                    }
                }
            };
            attempts.push(Attempt::new(candidate, outcome));
        }

        Ok(match fallback {
            Some((answer, candidate)) => AnswerResult {
                answer,
                source: Some(candidate.clone()),
                valid: false,
                attempts,
            },
            None => {
                tracing::info!(attempted = attempts.len(), "no candidate produced an answer");
                AnswerResult::not_found(attempts)
            }
        })
    }
}

impl Attempt {
    fn new(candidate: &CandidateContext, outcome: AttemptOutcome) -> Self {
        Self {
            source: candidate.source.clone(),
            similarity: candidate.similarity,
            outcome,
        }
    }
}
