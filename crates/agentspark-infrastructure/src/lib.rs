//! Filesystem and encoding adapters for AgentSpark.
//!
//! Implements the storage-facing traits of `agentspark-core`
//! (`ProjectRepository`, `SecretService`), loads `config.toml`, and provides
//! the share-link codec and directory export.

pub mod config_service;
pub mod export;
pub mod json_project_repository;
pub mod paths;
pub mod secret_service;
pub mod share;
pub mod storage;

pub use config_service::ConfigService;
pub use export::{ExportManifest, ExportSummary, export_team, read_manifest};
pub use json_project_repository::{JsonProjectRepository, new_project_id};
pub use paths::AgentSparkPaths;
pub use secret_service::SecretServiceImpl;
pub use share::{SharePayload, ShareError, ShareScheme};
