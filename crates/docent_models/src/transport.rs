//! The [`Transport`] seam between the answer generator and the network.

use crate::adapter::Headers;
use crate::error::LlmError;
use crate::provider::ProviderIdentity;
use async_trait::async_trait;
use core::time::Duration;
use serde_json::Value;

/// HTTP method of a vendor request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    /// `POST`, used by every built-in vendor.
    #[default]
    Post,
    /// `GET`.
    Get,
}

/// How the response body is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// One complete JSON document.
    #[default]
    Buffered,
    /// Newline-delimited JSON fragments whose partial texts are concatenated.
    LineDelimited,
}

/// A fully prepared vendor request.
#[derive(Clone)]
pub struct HttpRequest {
    /// Provider the request is for, used to label failures.
    pub provider: ProviderIdentity,
    /// HTTP method.
    pub method: HttpMethod,
    /// Endpoint URL without the query string.
    pub url: String,
    /// Request headers.
    pub headers: Headers,
    /// Query parameters.
    pub query: Vec<(String, String)>,
    /// JSON body.
    pub body: Value,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Response delivery mode.
    pub mode: ResponseMode,
}

impl core::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Header and query values may hold credentials.
        f.debug_struct("HttpRequest")
            .field("provider", &self.provider)
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field(
                "query",
                &self.query.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .field("timeout", &self.timeout)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// A successful transport result.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportResponse {
    /// A buffered JSON body, to be parsed by the adapter.
    Json(Value),
    /// Text already assembled from a line-delimited stream.
    Text(String),
}

/// Performs vendor requests.
///
/// Implementations convert every transport and HTTP failure into
/// [`LlmError::Api`]. Exceeding [`HttpRequest::timeout`] is a failure, not a hang.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Executes a request.
    async fn execute(&self, request: HttpRequest) -> Result<TransportResponse, LlmError>;
}
