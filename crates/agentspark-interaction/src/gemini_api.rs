//! Gemini `generateContent` adapter.
//!
//! The API key travels in the URL: the model's endpoint template carries
//! `{model}` and `{key}` placeholders.

use crate::wire::{map_transport_error, non_zero, read_json};
use agentspark_core::catalog::{ModelConfig, Provider};
use agentspark_core::{Completion, CompletionRequest, ProviderAdapter, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Adapter for the Gemini REST API.
#[derive(Clone, Default)]
pub struct GeminiApiAdapter {
    client: Client,
}

impl GeminiApiAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn build_body(request: &CompletionRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: request.system_prompt.clone(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: request.user_message.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            },
        }
    }
}

#[async_trait]
impl ProviderAdapter for GeminiApiAdapter {
    async fn invoke(
        &self,
        config: &ModelConfig,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<Completion, ProviderError> {
        let body = Self::build_body(request);

        let response = self
            .client
            .post(config.endpoint_url(api_key))
            .json(&body)
            .send()
            .await
            .map_err(|err| map_transport_error(Provider::Gemini, err))?;

        let parsed: GenerateContentResponse = read_json(Provider::Gemini, response).await?;
        Ok(extract_completion(parsed))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    total_token_count: Option<u64>,
}

/// First part of the first candidate; missing text is an empty string.
fn extract_completion(response: GenerateContentResponse) -> Completion {
    let tokens = non_zero(response.usage_metadata.and_then(|u| u.total_token_count));
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .unwrap_or_default();
    Completion::new(text, tokens)
}
