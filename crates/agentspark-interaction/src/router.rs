//! Dispatches requests to the adapter for a model's wire protocol.

use crate::anthropic_api::AnthropicApiAdapter;
use crate::gemini_api::GeminiApiAdapter;
use crate::openai_api::OpenAiApiAdapter;
use agentspark_core::catalog::{ModelConfig, Provider};
use agentspark_core::error::{Result, SparkError};
use agentspark_core::{Completion, CompletionRequest, ProviderAdapter, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// [`ProviderAdapter`] covering all three protocols with one HTTP client.
#[derive(Clone, Default)]
pub struct ProviderRouter {
    gemini: GeminiApiAdapter,
    openai: OpenAiApiAdapter,
    anthropic: AnthropicApiAdapter,
}

impl ProviderRouter {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            gemini: GeminiApiAdapter::new(client.clone()),
            openai: OpenAiApiAdapter::new(client.clone()),
            anthropic: AnthropicApiAdapter::new(client),
        }
    }

    /// Router whose requests give up after `timeout`.
    ///
    /// A transport timeout surfaces as a `timeout` failure, which the
    /// fallback policy treats as recoverable.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SparkError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client))
    }
}

#[async_trait]
impl ProviderAdapter for ProviderRouter {
    async fn invoke(
        &self,
        config: &ModelConfig,
        api_key: &str,
        request: &CompletionRequest,
    ) -> std::result::Result<Completion, ProviderError> {
        tracing::debug!(
            provider = %config.provider,
            model = %config.model_id,
            "[ProviderRouter] Dispatching request"
        );
        match config.provider {
            Provider::Gemini => self.gemini.invoke(config, api_key, request).await,
            Provider::OpenAi => self.openai.invoke(config, api_key, request).await,
            Provider::Anthropic => self.anthropic.invoke(config, api_key, request).await,
        }
    }
}
