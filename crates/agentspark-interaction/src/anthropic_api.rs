//! Anthropic messages API adapter.

use crate::wire::{map_transport_error, non_zero, read_json};
use agentspark_core::catalog::{ModelConfig, Provider};
use agentspark_core::{Completion, CompletionRequest, ProviderAdapter, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Adapter for the Anthropic `/v1/messages` endpoint.
#[derive(Clone, Default)]
pub struct AnthropicApiAdapter {
    client: Client,
}

impl AnthropicApiAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn build_body(config: &ModelConfig, request: &CompletionRequest) -> CreateMessageRequest {
        CreateMessageRequest {
            model: config.model_id.clone(),
            system: request.system_prompt.clone(),
            messages: vec![Message {
                role: "user",
                content: request.user_message.clone(),
            }],
            max_tokens: request.max_output_tokens,
        }
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicApiAdapter {
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
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| map_transport_error(Provider::Anthropic, err))?;

        let parsed: CreateMessageResponse = read_json(Provider::Anthropic, response).await?;
        Ok(extract_completion(parsed))
    }
}

#[derive(Serialize)]
struct CreateMessageRequest {
    model: String,
    system: String,
    messages: Vec<Message>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct CreateMessageResponse {
    #[serde(default)]
    content: Vec<ContentBlockResponse>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ContentBlockResponse {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

fn extract_completion(response: CreateMessageResponse) -> Completion {
    let tokens = non_zero(response.usage.map(|u| u.input_tokens + u.output_tokens));
    let text = response
        .content
        .into_iter()
        .next()
        .and_then(|block| block.text)
        .unwrap_or_default();
    Completion::new(text, tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let config = ModelConfig::new(
            Provider::Anthropic,
            "claude-haiku-4-5-20251001",
            "https://api.anthropic.com/v1/messages",
            "anthropic",
            "Claude Haiku 4.5",
        );
        let request = CompletionRequest::new("sys", "usr").with_max_output_tokens(512);
        let body =
            serde_json::to_value(AnthropicApiAdapter::build_body(&config, &request)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "claude-haiku-4-5-20251001",
                "system": "sys",
                "messages": [{ "role": "user", "content": "usr" }],
                "max_tokens": 512
            })
        );
    }

    #[test]
    fn test_tokens_sum_input_and_output() {
        let response: CreateMessageResponse = serde_json::from_value(json!({
            "content": [{ "type": "text", "text": "Hey" }],
            "usage": { "input_tokens": 10, "output_tokens": 4 }
        }))
        .unwrap();
        assert_eq!(extract_completion(response), Completion::new("Hey", Some(14)));
    }
}
