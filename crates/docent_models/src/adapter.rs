//! The [`ProviderAdapter`] trait implemented once per vendor.

use crate::config::EffectiveConfig;
use crate::error::LlmError;
use crate::provider::ProviderIdentity;
use crate::transport::ResponseMode;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Content type sent with every JSON request.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Request headers, ordered by name.
pub type Headers = BTreeMap<String, String>;

/// How a vendor expects the credential to be attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <credential>`.
    Bearer,
    /// A vendor-specific header carrying the raw credential.
    Header(&'static str),
    /// A query-string parameter carrying the raw credential.
    QueryParam(&'static str),
    /// No credential is attached.
    None,
}

/// A vendor-shaped request body.
///
/// Owned by the call that built it and discarded after the HTTP call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPayload(Value);

impl RequestPayload {
    /// Serializes a typed vendor request.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Api`] if the request cannot be serialized.
    pub fn from_request<T: Serialize>(
        provider: ProviderIdentity,
        request: &T,
    ) -> Result<Self, LlmError> {
        serde_json::to_value(request)
            .map(Self)
            .map_err(|err| LlmError::api(provider, format!("failed to serialize request: {err}")))
    }

    /// Borrows the JSON body.
    #[must_use]
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Consumes the payload, returning the JSON body.
    #[must_use]
    pub fn into_json(self) -> Value {
        self.0
    }
}

impl From<Value> for RequestPayload {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Trait implemented by each vendor adapter.
///
/// An adapter is a set of pure functions translating between the uniform
/// contract (question, context, [`EffectiveConfig`]) and one vendor's wire
/// format. It never performs I/O; the
/// [`Transport`](crate::transport::Transport) does.
pub trait ProviderAdapter: Send + Sync + 'static {
    /// The vendor this adapter speaks to.
    fn identity(&self) -> ProviderIdentity;

    /// How the credential is attached.
    fn auth_scheme(&self) -> AuthScheme;

    /// Builds the vendor-shaped request body.
    ///
    /// Non-empty `context` is prepended to the question. A system message is
    /// always included.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Configuration`] if a value the vendor requires is missing.
    fn build_request_body(
        &self,
        question: &str,
        context: Option<&str>,
        config: &EffectiveConfig,
    ) -> Result<RequestPayload, LlmError>;

    /// Extracts the answer text from a decoded response body.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Api`] for vendor-reported failures and for
    /// unexpected or empty response shapes.
    fn parse_response(&self, body: Value) -> Result<String, LlmError>;

    /// Builds request headers, including the credential for header-based schemes.
    ///
    /// # Errors
    ///
    /// Implementations may fail if a header value cannot be built.
    fn build_headers(&self, config: &EffectiveConfig) -> Result<Headers, LlmError> {
        Ok(auth_headers(self.auth_scheme(), config))
    }

    /// Query parameters appended to the endpoint, including the credential for
    /// query-based schemes.
    fn query_params(&self, config: &EffectiveConfig) -> Vec<(String, String)> {
        match (self.auth_scheme(), config.credential()) {
            (AuthScheme::QueryParam(name), Some(credential)) => {
                vec![(name.to_string(), credential.to_string())]
            }
            _ => Vec::new(),
        }
    }

    /// The final endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Configuration`] if the endpoint cannot be formed.
    fn endpoint(&self, config: &EffectiveConfig) -> Result<String, LlmError> {
        Ok(config.endpoint().to_string())
    }

    /// How the response body is delivered.
    fn response_mode(&self, _config: &EffectiveConfig) -> ResponseMode {
        ResponseMode::Buffered
    }
}

/// Content type plus the credential header for `scheme`.
///
/// Query-based and credential-free schemes only get the content type.
#[must_use]
pub fn auth_headers(scheme: AuthScheme, config: &EffectiveConfig) -> Headers {
    let mut headers = Headers::new();
    headers.insert("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string());

    let Some(credential) = config.credential() else {
        return headers;
    };
    match scheme {
        AuthScheme::Bearer => {
            headers.insert("Authorization".to_string(), format!("Bearer {credential}"));
        }
        AuthScheme::Header(name) => {
            headers.insert(name.to_string(), credential.to_string());
        }
        AuthScheme::QueryParam(_) | AuthScheme::None => {}
    }
    headers
}

/// Prepends non-empty `context` to `question`.
#[must_use]
pub fn compose_prompt(question: &str, context: Option<&str>) -> String {
    match context.map(str::trim).filter(|context| !context.is_empty()) {
        Some(context) => format!("{context}\n\nQuestion: {question}"),
        None => question.to_string(),
    }
}
