//! LLM I/O for AgentSpark.
//!
//! HTTP adapters for the three supported wire protocols, the router that
//! picks one per model, the built-in model catalog and the fallback
//! orchestrator that ties them to the session's span recorder.

pub mod anthropic_api;
pub mod gemini_api;
pub mod openai_api;
pub mod orchestrator;
pub mod router;
pub mod scripted;
pub mod supported_models;
mod wire;

pub use anthropic_api::AnthropicApiAdapter;
pub use gemini_api::GeminiApiAdapter;
pub use openai_api::OpenAiApiAdapter;
pub use orchestrator::{CallNotice, InferenceOrchestrator, RequestDefaults};
pub use router::ProviderRouter;
pub use scripted::{ScriptStep, ScriptedAdapter};
pub use supported_models::builtin_catalog;
