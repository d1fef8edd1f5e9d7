//! Application configuration model.
//!
//! Loaded from `config.toml`; every section and field is optional and falls
//! back to the defaults below.

use crate::fallback::{
    DEFAULT_COOLDOWN, DEFAULT_FALLBACK_KEYWORDS, DEFAULT_FALLBACK_STATUSES, FallbackPolicy,
};
use crate::level::Level;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_CHAIN_TAG: &str = "gemini";
pub const DEFAULT_TEMPERATURE: f64 = 0.8;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4096;
pub const DEFAULT_MAX_QUESTIONS: u32 = 6;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelSection,
    pub fallback: FallbackSection,
    pub generation: GenerationSection,
    pub interview: InterviewSection,
}

/// Primary model selection.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ModelSection {
    pub chain_tag: String,
    /// Model within the chain; the chain's first model when unset
    pub model_id: Option<String>,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            chain_tag: DEFAULT_CHAIN_TAG.to_string(),
            model_id: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FallbackSection {
    pub cooldown_ms: u64,
    pub statuses: Vec<u16>,
    pub keywords: Vec<String>,
}

impl Default for FallbackSection {
    fn default() -> Self {
        Self {
            cooldown_ms: DEFAULT_COOLDOWN.as_millis() as u64,
            statuses: DEFAULT_FALLBACK_STATUSES.to_vec(),
            keywords: DEFAULT_FALLBACK_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GenerationSection {
    pub temperature: f64,
    pub max_output_tokens: u32,
    /// Transport timeout per request; none by default
    pub request_timeout_secs: Option<u64>,
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            request_timeout_secs: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct InterviewSection {
    pub max_questions: u32,
    pub lang: String,
    pub level: Level,
}

impl Default for InterviewSection {
    fn default() -> Self {
        Self {
            max_questions: DEFAULT_MAX_QUESTIONS,
            lang: "en".to_string(),
            level: Level::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> crate::error::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> crate::error::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy {
            statuses: self.fallback.statuses.clone(),
            keywords: self.fallback.keywords.clone(),
            cooldown: Duration::from_millis(self.fallback.cooldown_ms),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.generation.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.model.chain_tag, "gemini");
        assert_eq!(config.fallback_policy(), FallbackPolicy::default());
        assert_eq!(config.interview.max_questions, 6);
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [model]
            chain_tag = "anthropic"
            model_id = "claude-haiku-4-5-20251001"

            [fallback]
            cooldown_ms = 0

            [generation]
            request_timeout_secs = 30

            [interview]
            level = "inferno"
            "#,
        )
        .unwrap();

        assert_eq!(config.model.chain_tag, "anthropic");
        assert_eq!(config.fallback_policy().cooldown, Duration::ZERO);
        assert_eq!(config.fallback.statuses, DEFAULT_FALLBACK_STATUSES.to_vec());
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.generation.max_output_tokens, 4096);
        assert_eq!(config.interview.level, Level::Inferno);
    }

    #[test]
    fn test_malformed_toml_is_serialization_error() {
        let err = AppConfig::from_toml_str("[model\nchain_tag=").unwrap_err();
        assert!(err.is_serialization());
    }

    #[test]
    fn test_round_trip() {
        let config = AppConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(AppConfig::from_toml_str(&text).unwrap(), config);
    }
}
