//! Model configuration domain model.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Wire protocol family spoken by a model endpoint.
///
/// Several vendors share a protocol: Mistral and Groq expose
/// OpenAI-compatible chat completions, so their models use [`Provider::OpenAi`].
#[derive(
    Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Provider {
    /// Google Gemini `generateContent`
    Gemini,
    /// OpenAI-compatible chat completions
    #[serde(rename = "openai")]
    #[strum(serialize = "openai")]
    OpenAi,
    /// Anthropic messages API
    Anthropic,
}

impl Provider {
    /// Name used in generic error messages (`"<vendor> error <status>"`).
    pub fn vendor_name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
        }
    }
}

/// One callable model: which protocol, which model id, where to send it.
///
/// Defined once at startup from a static table and never mutated.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub provider: Provider,
    /// Vendor model id, e.g. `gemini-2.0-flash`
    pub model_id: String,
    /// Endpoint URL; may contain `{model}` and `{key}` placeholders
    pub endpoint_template: String,
    /// Fallback chain this model belongs to
    pub chain_tag: String,
    /// Human readable label
    pub display_label: String,
}

impl ModelConfig {
    pub fn new(
        provider: Provider,
        model_id: impl Into<String>,
        endpoint_template: impl Into<String>,
        chain_tag: impl Into<String>,
        display_label: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model_id: model_id.into(),
            endpoint_template: endpoint_template.into(),
            chain_tag: chain_tag.into(),
            display_label: display_label.into(),
        }
    }

    /// Label shown in traces and notices; falls back to the model id.
    pub fn label(&self) -> &str {
        if self.display_label.is_empty() {
            &self.model_id
        } else {
            &self.display_label
        }
    }

    /// Substitutes `{model}` and `{key}` into the endpoint template.
    pub fn endpoint_url(&self, api_key: &str) -> String {
        self.endpoint_template
            .replace("{model}", &self.model_id)
            .replace("{key}", api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_provider_wire_names() {
        assert_eq!(Provider::OpenAi.to_string(), "openai");
        assert_eq!(Provider::from_str("anthropic").unwrap(), Provider::Anthropic);
        assert_eq!(
            serde_json::to_string(&Provider::OpenAi).unwrap(),
            "\"openai\""
        );
    }

    #[test]
    fn test_endpoint_url_substitution() {
        let config = ModelConfig::new(
            Provider::Gemini,
            "gemini-2.0-flash",
            "https://example.test/models/{model}:generateContent?key={key}",
            "gemini",
            "Gemini 2.0 Flash",
        );
        assert_eq!(
            config.endpoint_url("abc"),
            "https://example.test/models/gemini-2.0-flash:generateContent?key=abc"
        );
    }

    #[test]
    fn test_label_falls_back_to_model_id() {
        let config = ModelConfig::new(Provider::OpenAi, "gpt-4o", "u", "openai", "");
        assert_eq!(config.label(), "gpt-4o");
    }
}
