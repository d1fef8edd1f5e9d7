//! Built-in models and their fallback chains.
//!
//! # Chains
//!
//! | Chain | Protocol | Models (in fallback order) |
//! |-------|----------|----------------------------|
//! | `gemini` | Gemini | `gemini-3-flash-preview`, `gemini-2.0-flash`, `gemini-1.5-flash` |
//! | `openai` | OpenAI | `gpt-4o`, `gpt-4o-mini`, `gpt-3.5-turbo` |
//! | `anthropic` | Anthropic | `claude-sonnet-4-6`, `claude-haiku-4-5-20251001` |
//! | `mistral` | OpenAI | `mistral-large-latest`, `mistral-small-latest`, `open-mistral-nemo` |
//! | `groq` | OpenAI | `llama-3.3-70b-versatile`, `llama-3.1-8b-instant`, `gemma2-9b-it` |
//!
//! # Adding a model
//!
//! 1. Add a row to `BUILTIN_MODELS` below, in its chain's fallback position.
//! 2. Update the table above.
//! 3. If it opens a new chain, add its key to `SecretConfig` and
//!    `env_var_for` in `agentspark-core/src/secret.rs`.

use agentspark_core::catalog::{ModelCatalog, ModelConfig, Provider};
use once_cell::sync::Lazy;

const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent?key={key}";
const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const MISTRAL_ENDPOINT: &str = "https://api.mistral.ai/v1/chat/completions";
const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// (chain, protocol, endpoint, model id, label)
const BUILTIN_MODELS: &[(&str, Provider, &str, &str, &str)] = &[
    ("gemini", Provider::Gemini, GEMINI_ENDPOINT, "gemini-3-flash-preview", "Gemini 3 Flash Preview"),
    ("gemini", Provider::Gemini, GEMINI_ENDPOINT, "gemini-2.0-flash", "Gemini 2.0 Flash"),
    ("gemini", Provider::Gemini, GEMINI_ENDPOINT, "gemini-1.5-flash", "Gemini 1.5 Flash"),
    ("openai", Provider::OpenAi, OPENAI_ENDPOINT, "gpt-4o", "GPT-4o"),
    ("openai", Provider::OpenAi, OPENAI_ENDPOINT, "gpt-4o-mini", "GPT-4o mini"),
    ("openai", Provider::OpenAi, OPENAI_ENDPOINT, "gpt-3.5-turbo", "GPT-3.5 Turbo"),
    ("anthropic", Provider::Anthropic, ANTHROPIC_ENDPOINT, "claude-sonnet-4-6", "Claude Sonnet 4.6"),
    ("anthropic", Provider::Anthropic, ANTHROPIC_ENDPOINT, "claude-haiku-4-5-20251001", "Claude Haiku 4.5"),
    ("mistral", Provider::OpenAi, MISTRAL_ENDPOINT, "mistral-large-latest", "Mistral Large"),
    ("mistral", Provider::OpenAi, MISTRAL_ENDPOINT, "mistral-small-latest", "Mistral Small"),
    ("mistral", Provider::OpenAi, MISTRAL_ENDPOINT, "open-mistral-nemo", "Mistral Nemo"),
    ("groq", Provider::OpenAi, GROQ_ENDPOINT, "llama-3.3-70b-versatile", "Llama 3.3 70B"),
    ("groq", Provider::OpenAi, GROQ_ENDPOINT, "llama-3.1-8b-instant", "Llama 3.1 8B"),
    ("groq", Provider::OpenAi, GROQ_ENDPOINT, "gemma2-9b-it", "Gemma2 9B"),
];

static BUILTIN_CATALOG: Lazy<ModelCatalog> = Lazy::new(|| {
    ModelCatalog::from_models(BUILTIN_MODELS.iter().map(
        |(chain, provider, endpoint, model_id, label)| {
            ModelConfig::new(*provider, *model_id, *endpoint, *chain, *label)
        },
    ))
});

/// The static chain table.
pub fn builtin_catalog() -> &'static ModelCatalog {
    &BUILTIN_CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_lengths() {
        let catalog = builtin_catalog();
        let lengths: Vec<(&str, usize)> = catalog
            .tags()
            .map(|tag| (tag, catalog.chain(tag).len()))
            .collect();
        assert_eq!(
            lengths,
            vec![
                ("gemini", 3),
                ("openai", 3),
                ("anthropic", 2),
                ("mistral", 3),
                ("groq", 3)
            ]
        );
    }

    #[test]
    fn test_model_ids_are_unique() {
        let mut ids: Vec<&str> = builtin_catalog().models().map(|m| m.model_id.as_str()).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_compatible_vendors_use_openai_protocol() {
        let catalog = builtin_catalog();
        for tag in ["mistral", "groq"] {
            assert!(catalog.chain(tag).iter().all(|m| m.provider == Provider::OpenAi));
        }
        let primary = catalog.primary_for("gemini", None).unwrap();
        assert_eq!(primary.model_id, "gemini-3-flash-preview");
        assert!(primary.endpoint_url("k").ends_with(":generateContent?key=k"));
    }
}
