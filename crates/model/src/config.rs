//! Provider configuration.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Groq chat completions endpoint.
pub const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// OpenAI chat completions endpoint.
pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Supported providers. Both speak the OpenAI chat completions API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Groq, the primary fast-inference provider.
    #[default]
    Groq,
    /// OpenAI, the general-purpose fallback.
    OpenAI,
}

impl ProviderKind {
    /// Default chat completions endpoint.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Groq => GROQ_ENDPOINT,
            Self::OpenAI => OPENAI_ENDPOINT,
        }
    }

    /// Default model identifier.
    pub fn default_model(self) -> &'static str {
        match self {
            Self::Groq => "llama-3.3-70b-versatile",
            Self::OpenAI => "gpt-4o-mini",
        }
    }

    /// Environment variable holding the API key.
    pub fn key_var(self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
        }
    }
}

/// Everything needed to build a [`Provider`](crate::Provider).
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// Which provider to talk to.
    pub kind: ProviderKind,
    /// Model identifier, the provider default when unset.
    pub model: Option<CompactString>,
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Endpoint override.
    pub base_url: Option<String>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
}

impl ProviderConfig {
    /// The model identifier to request.
    pub fn model(&self) -> CompactString {
        self.model
            .clone()
            .unwrap_or_else(|| self.kind.default_model().into())
    }

    /// The endpoint to post to.
    pub fn endpoint(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.kind.endpoint())
    }
}
