//! Inference call contract shared by adapters, the orchestrator and drivers.

use crate::catalog::ModelConfig;
use crate::config::{DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE};
use async_trait::async_trait;
use thiserror::Error;

/// Generic request every provider protocol is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_message: String,
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl CompletionRequest {
    pub fn new(system_prompt: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_message: user_message.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

/// Normalized successful response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Completion {
    /// Completion text; empty when the vendor returned none
    pub text: String,
    /// Total token usage, when the vendor reported a non-zero figure
    pub tokens: Option<u64>,
}

impl Completion {
    pub fn new(text: impl Into<String>, tokens: Option<u64>) -> Self {
        Self {
            text: text.into(),
            tokens,
        }
    }
}

/// Failure of a single adapter invocation.
///
/// `status` is the HTTP status; transport failures have none.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    pub status: Option<u16>,
    pub message: String,
}

impl ProviderError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }
}

/// Terminal failure of one logical inference call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    /// No API key configured; nothing was attempted
    #[error("API key is missing for model chain '{chain_tag}'")]
    MissingApiKey { chain_tag: String },

    /// Model selection is invalid; nothing was attempted
    #[error("Configuration error: {0}")]
    Config(String),

    /// The failure that ended the call
    #[error("{message}")]
    Provider { status: Option<u16>, message: String },

    /// The loop ended without recording any failure
    #[error("All models failed")]
    AllModelsFailed,

    #[error("Inference call cancelled")]
    Cancelled,
}

impl InferenceError {
    /// HTTP status of the terminal failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            InferenceError::Provider { status, .. } => *status,
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            InferenceError::Provider { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Configuration problems are reported before any attempt is made.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            InferenceError::MissingApiKey { .. } | InferenceError::Config(_)
        )
    }
}

impl From<ProviderError> for InferenceError {
    fn from(err: ProviderError) -> Self {
        InferenceError::Provider {
            status: err.status,
            message: err.message,
        }
    }
}

/// Translates the generic request into one vendor protocol.
///
/// Every invocation has exactly one outcome: a [`Completion`] or a
/// [`ProviderError`].
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    async fn invoke(
        &self,
        config: &ModelConfig,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<Completion, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_converts_with_status() {
        let err: InferenceError = ProviderError::http(429, "Rate limit").into();
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.message(), "Rate limit");
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_missing_key_is_configuration() {
        let err = InferenceError::MissingApiKey {
            chain_tag: "gemini".into(),
        };
        assert!(err.is_configuration());
        assert_eq!(err.status(), None);
        assert!(err.message().contains("gemini"));
    }

    #[test]
    fn test_request_defaults() {
        let request = CompletionRequest::new("sys", "user");
        assert_eq!(request.temperature, 0.8);
        assert_eq!(request.max_output_tokens, 4096);
    }
}
