//! Domain layer of AgentSpark.
//!
//! Holds the types and invariants that do not depend on HTTP or storage:
//! model catalog, fallback policy, call tracing, version history and saved
//! projects. Traits for the outer layers (`ProviderAdapter`,
//! `ProjectRepository`, `SecretService`) are defined here and implemented in
//! the interaction and infrastructure crates.

pub mod agent;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fallback;
pub mod inference;
pub mod level;
pub mod project;
pub mod secret;
pub mod trace;
pub mod version;

// Re-export common types
pub use error::{Result, SparkError};
pub use inference::{Completion, CompletionRequest, InferenceError, ProviderAdapter, ProviderError};
