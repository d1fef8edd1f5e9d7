//! API key configuration and the service that loads it.

use serde::{Deserialize, Serialize};

/// API key for one fallback chain.
#[derive(Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ProviderSecret {
    pub api_key: String,
}

impl std::fmt::Debug for ProviderSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSecret")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Contents of `secret.json`, keyed by chain tag.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<ProviderSecret>,
    #[serde(default)]
    pub openai: Option<ProviderSecret>,
    #[serde(default)]
    pub anthropic: Option<ProviderSecret>,
    #[serde(default)]
    pub mistral: Option<ProviderSecret>,
    #[serde(default)]
    pub groq: Option<ProviderSecret>,
}

impl SecretConfig {
    /// Non-empty key configured for `chain_tag`.
    pub fn api_key_for(&self, chain_tag: &str) -> Option<&str> {
        let secret = match chain_tag {
            "gemini" => self.gemini.as_ref(),
            "openai" => self.openai.as_ref(),
            "anthropic" => self.anthropic.as_ref(),
            "mistral" => self.mistral.as_ref(),
            "groq" => self.groq.as_ref(),
            _ => None,
        }?;
        let key = secret.api_key.trim();
        (!key.is_empty()).then_some(key)
    }
}

/// Environment variable consulted when `secret.json` has no key for a chain.
pub fn env_var_for(chain_tag: &str) -> Option<&'static str> {
    match chain_tag {
        "gemini" => Some("GEMINI_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        "anthropic" => Some("ANTHROPIC_API_KEY"),
        "mistral" => Some("MISTRAL_API_KEY"),
        "groq" => Some("GROQ_API_KEY"),
        _ => None,
    }
}

/// Service for loading API keys.
///
/// Implementations must never log key material or include it in error
/// messages.
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration. A missing file yields an empty config.
    async fn load_secrets(&self) -> crate::error::Result<SecretConfig>;

    /// Resolves the key for `chain_tag`, consulting the environment when the
    /// file has none.
    async fn api_key_for(&self, chain_tag: &str) -> crate::error::Result<Option<String>>;
}
