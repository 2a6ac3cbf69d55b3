//! The closed set of supported vendor identities.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Identity of an LLM vendor.
///
/// Selects the credential namespace, the per-provider configuration tables and
/// the authentication convention. Adapters report their identity through
/// [`ProviderAdapter::identity`](crate::ProviderAdapter::identity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderIdentity {
    /// Chat-completion style API.
    OpenAi,
    /// Messages style API with a separate system field.
    Anthropic,
    /// Generative-content style API, model carried in the endpoint path.
    Gemini,
    /// Inference-endpoint style API, endpoint is `base/model`.
    HuggingFace,
    /// Self-hosted generate API with optional line-delimited streaming.
    Ollama,
}

impl ProviderIdentity {
    /// All identities, in registration order.
    pub const ALL: [Self; 5] = [
        Self::OpenAi,
        Self::Anthropic,
        Self::Gemini,
        Self::HuggingFace,
        Self::Ollama,
    ];

    /// Returns the canonical lower-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
            Self::HuggingFace => "huggingface",
            Self::Ollama => "ollama",
        }
    }

    /// Environment variable consulted for this provider's credential.
    #[must_use]
    pub const fn credential_env_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
            Self::HuggingFace => "HUGGINGFACE_API_KEY",
            Self::Ollama => "OLLAMA_API_KEY",
        }
    }

    /// Whether a credential must be resolved for this provider.
    ///
    /// The self-hosted provider runs locally and is exempt.
    #[must_use]
    pub const fn requires_credential(self) -> bool {
        !matches!(self, Self::Ollama)
    }

    /// Whether the model identifier is part of the configured endpoint URL.
    #[must_use]
    pub const fn model_in_endpoint(self) -> bool {
        matches!(self, Self::Gemini)
    }
}

impl fmt::Display for ProviderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`ProviderIdentity`] from a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized provider identity: {0}")]
pub struct ParseProviderError(pub String);

impl FromStr for ProviderIdentity {
    type Err = ParseProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == lowered)
            .ok_or(ParseProviderError(lowered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("OpenAI".parse(), Ok(ProviderIdentity::OpenAi));
        assert_eq!(" ollama ".parse(), Ok(ProviderIdentity::Ollama));
        assert!("mistral".parse::<ProviderIdentity>().is_err());
    }

    #[test]
    fn serde_matches_display() {
        for id in ProviderIdentity::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{id}\""));
        }
    }

    #[test]
    fn only_self_hosted_is_credential_exempt() {
        let exempt: Vec<_> = ProviderIdentity::ALL
            .into_iter()
            .filter(|id| !id.requires_credential())
            .collect();
        assert_eq!(exempt, vec![ProviderIdentity::Ollama]);
    }
}
