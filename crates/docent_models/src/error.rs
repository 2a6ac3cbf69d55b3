//! Error types for answer generation.

use crate::provider::ProviderIdentity;

/// Maximum number of characters of a response body rendered in diagnostics.
pub const RESPONSE_PREVIEW_LEN: usize = 200;

/// Errors produced while generating an answer.
///
/// There are exactly two kinds. Both terminate the current request; neither is
/// retried.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Missing or invalid setup: unknown provider, absent mandatory value.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The vendor call failed: HTTP error status, transport failure, a
    /// vendor-reported soft failure or an unparseable response.
    #[error("{}", describe_api_error(.provider, .message, .status, .body))]
    Api {
        /// Provider that produced the failure.
        provider: ProviderIdentity,
        /// Human readable message.
        message: String,
        /// HTTP status code if the server answered.
        status: Option<u16>,
        /// Best-effort response body.
        body: Option<String>,
    },
}

impl LlmError {
    /// Creates a [`LlmError::Configuration`].
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration(reason.into())
    }

    /// Creates a [`LlmError::Api`] without status or body.
    pub fn api(provider: ProviderIdentity, message: impl Into<String>) -> Self {
        Self::Api {
            provider,
            message: message.into(),
            status: None,
            body: None,
        }
    }

    /// Attaches an HTTP status code to an API error. No-op for configuration errors.
    #[must_use]
    pub fn with_status(mut self, code: u16) -> Self {
        if let Self::Api { status, .. } = &mut self {
            *status = Some(code);
        }
        self
    }

    /// Attaches a response body to an API error. No-op for configuration errors.
    #[must_use]
    pub fn with_body(mut self, text: impl Into<String>) -> Self {
        if let Self::Api { body, .. } = &mut self {
            *body = Some(text.into());
        }
        self
    }

    /// Returns `true` for [`LlmError::Configuration`].
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns the HTTP status of an API error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::Configuration(_) => None,
        }
    }

    /// Returns the response body truncated to [`RESPONSE_PREVIEW_LEN`] characters.
    #[must_use]
    pub fn response_preview(&self) -> Option<String> {
        match self {
            Self::Api {
                body: Some(body), ..
            } => Some(preview(body)),
            _ => None,
        }
    }
}

fn preview(body: &str) -> String {
    match body.char_indices().nth(RESPONSE_PREVIEW_LEN) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

fn describe_api_error(
    provider: &ProviderIdentity,
    message: &str,
    status: &Option<u16>,
    body: &Option<String>,
) -> String {
    let mut parts = vec![format!("{provider} API error: {message}")];
    if let Some(status) = status {
        parts.push(format!("status: {status}"));
    }
    if let Some(body) = body.as_deref().filter(|body| !body.is_empty()) {
        parts.push(format!("response: {}", preview(body)));
    }
    parts.join("\n")
}

/// Error creating a provider adapter from the registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No adapter is registered under the requested identifier.
    #[error("unknown provider '{name}'; registered providers: {}", .available.join(", "))]
    UnknownProvider {
        /// The identifier that was requested (lower-cased).
        name: String,
        /// Identifiers registered at the time of the lookup, sorted.
        available: Vec<String>,
    },
}

impl From<RegistryError> for LlmError {
    fn from(err: RegistryError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Error loading [`Settings`](crate::Settings) from disk.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings from {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON for the settings schema.
    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),
}
