//! Test doubles for downstream crates.
//!
//! Enabled with the `test-utils` feature.

use crate::error::LlmError;
use crate::transport::{HttpRequest, Transport, TransportResponse};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;

/// A [`Transport`] that replays queued responses and records every request.
///
/// ```
/// use docent_models::testing::ScriptedTransport;
/// use serde_json::json;
///
/// let transport = ScriptedTransport::new()
///     .with_json(json!({ "response": "first" }))
///     .with_text("second");
/// assert_eq!(transport.call_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<TransportResponse, LlmError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    /// Creates a transport with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a buffered JSON response.
    #[must_use]
    pub fn with_json(self, body: Value) -> Self {
        self.responses
            .lock()
            .push_back(Ok(TransportResponse::Json(body)));
        self
    }

    /// Queues an assembled streamed response.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.responses
            .lock()
            .push_back(Ok(TransportResponse::Text(text.into())));
        self
    }

    /// Queues a failure.
    #[must_use]
    pub fn with_error(self, error: LlmError) -> Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    /// Number of requests executed so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Requests executed so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<TransportResponse, LlmError> {
        let provider = request.provider;
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::api(provider, "no scripted response left")))
    }
}
