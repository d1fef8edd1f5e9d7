//! OpenAI-compatible chat completions adapter.
//!
//! Also serves Mistral and Groq, which expose the same protocol at their own
//! endpoints.

use crate::wire::{map_transport_error, non_zero, read_json};
use agentspark_core::catalog::{ModelConfig, Provider};
use agentspark_core::{Completion, CompletionRequest, ProviderAdapter, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Adapter for OpenAI-style `/chat/completions` endpoints.
#[derive(Clone, Default)]
pub struct OpenAiApiAdapter {
    client: Client,
}

impl OpenAiApiAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn build_body(config: &ModelConfig, request: &CompletionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: config.model_id.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: request.user_message.clone(),
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_output_tokens,
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiApiAdapter {
    async fn invoke(
        &self,
        config: &ModelConfig,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<Completion, ProviderError> {
        let body = Self::build_body(config, request);

        let response = self
            .client
            .post(config.endpoint_url(api_key))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| map_transport_error(Provider::OpenAi, err))?;

        let parsed: ChatCompletionResponse = read_json(Provider::OpenAi, response).await?;
        Ok(extract_completion(parsed))
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: Option<u64>,
}

fn extract_completion(response: ChatCompletionResponse) -> Completion {
    let tokens = non_zero(response.usage.and_then(|u| u.total_tokens));
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .unwrap_or_default();
    Completion::new(text, tokens)
}
