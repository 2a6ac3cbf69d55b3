//! Single-provider answer generation.

use docent_models::config::{EnvSource, ProcessEnv};
use docent_models::{
    EffectiveConfig, GenerationOptions, HttpMethod, HttpRequest, LlmError, ProviderAdapter,
    ProviderIdentity, ProviderRegistry, RegistryError, Settings, Transport, TransportResponse,
};
use serde_json::Value;
use std::sync::Arc;

/// Stages of one [`AnswerGenerator::generate_answer`] call.
///
/// Any stage may end the call with an [`LlmError`]; nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    /// Building the [`EffectiveConfig`].
    ResolvingConfig,
    /// Building the endpoint, headers and vendor body.
    BuildingPayload,
    /// Waiting on the transport.
    Requesting,
    /// Extracting the answer text.
    ParsingResponse,
    /// Answer produced.
    Done,
}

/// Facade driving one provider adapter through a transport.
///
/// Each call resolves a fresh [`EffectiveConfig`] and issues exactly one
/// request. Configuration failures are reported before the transport is
/// touched.
#[derive(Clone)]
pub struct AnswerGenerator {
    adapter: Arc<dyn ProviderAdapter>,
    transport: Arc<dyn Transport>,
    settings: Arc<Settings>,
    env: Arc<dyn EnvSource>,
}

impl core::fmt::Debug for AnswerGenerator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AnswerGenerator")
            .field("provider", &self.adapter.identity())
            .finish_non_exhaustive()
    }
}

impl AnswerGenerator {
    /// Creates a generator reading credentials from the process environment.
    #[must_use]
    pub fn new(
        adapter: Arc<dyn ProviderAdapter>,
        transport: Arc<dyn Transport>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            adapter,
            transport,
            settings,
            env: Arc::new(ProcessEnv),
        }
    }

    /// Creates a generator for the provider registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownProvider`] if `name` is not registered.
    pub fn from_registry(
        registry: &ProviderRegistry,
        name: &str,
        transport: Arc<dyn Transport>,
        settings: Arc<Settings>,
    ) -> Result<Self, RegistryError> {
        let adapter = registry.create_provider(name)?;
        Ok(Self::new(adapter, transport, settings))
    }

    /// Replaces the environment credentials are read from.
    #[must_use]
    pub fn with_env(mut self, env: Arc<dyn EnvSource>) -> Self {
        self.env = env;
        self
    }

    /// The provider this generator talks to.
    #[must_use]
    pub fn provider(&self) -> ProviderIdentity {
        self.adapter.identity()
    }

    /// Generates an answer to `question`, using `context` when non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Configuration`] if a mandatory value cannot be
    /// resolved, and [`LlmError::Api`] for transport failures, error statuses
    /// and vendor-reported failures.
    pub async fn generate_answer(
        &self,
        question: &str,
        context: Option<&str>,
        options: &GenerationOptions,
    ) -> Result<String, LlmError> {
        let mut stage = GenerationStage::ResolvingConfig;
        let result = self.run(&mut stage, question, context, options).await;
        if let Err(err) = &result {
            tracing::debug!(provider = %self.provider(), ?stage, error = %err, "generation failed");
        }
        result
    }

    async fn run(
        &self,
        stage: &mut GenerationStage,
        question: &str,
        context: Option<&str>,
        options: &GenerationOptions,
    ) -> Result<String, LlmError> {
        let provider = self.provider();
        tracing::debug!(provider = %provider, stage = ?stage, "resolving configuration");
        let config =
            EffectiveConfig::resolve(provider, options, &self.settings, self.env.as_ref())?;

        advance(stage, GenerationStage::BuildingPayload, provider);
        let request = HttpRequest {
            provider,
            method: HttpMethod::Post,
            url: self.adapter.endpoint(&config)?,
            headers: self.adapter.build_headers(&config)?,
            query: self.adapter.query_params(&config),
            body: self
                .adapter
                .build_request_body(question, context, &config)?
                .into_json(),
            timeout: config.timeout(),
            mode: self.adapter.response_mode(&config),
        };

        advance(stage, GenerationStage::Requesting, provider);
        let body = match self.transport.execute(request).await? {
            TransportResponse::Json(json) => json,
            TransportResponse::Text(text) => Value::String(text),
        };

        advance(stage, GenerationStage::ParsingResponse, provider);
        let answer = self.adapter.parse_response(body).map_err(|err| match err {
            LlmError::Api { .. } => err,
            other => LlmError::api(provider, format!("failed to parse response: {other}")),
        })?;

        advance(stage, GenerationStage::Done, provider);
        Ok(answer)
    }
}

fn advance(stage: &mut GenerationStage, next: GenerationStage, provider: ProviderIdentity) {
    tracing::debug!(provider = %provider, from = ?*stage, to = ?next, "generation stage");
    *stage = next;
}
