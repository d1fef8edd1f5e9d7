//! Unified path management for AgentSpark files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/agentspark/        # Config directory
//! ├── config.toml              # Application configuration
//! ├── secret.json              # API keys
//! └── projects/                # One JSON file per saved project
//!     └── proj_<ms>_<suffix>.json
//! ```

use agentspark_core::{Result, SparkError};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "agentspark";

/// Resolves every AgentSpark path from one base directory.
///
/// The base is the platform config directory joined with `agentspark`, or a
/// caller-supplied directory (tests, `--config-dir`).
#[derive(Debug, Clone)]
pub struct AgentSparkPaths {
    base: PathBuf,
}

impl AgentSparkPaths {
    /// Uses `base` when given, the platform config directory otherwise.
    pub fn new(base: Option<&Path>) -> Result<Self> {
        let base = match base {
            Some(path) => path.to_path_buf(),
            None => dirs::config_dir()
                .ok_or_else(|| SparkError::config("Cannot find config directory"))?
                .join(APP_DIR),
        };
        Ok(Self { base })
    }

    pub fn config_dir(&self) -> &Path {
        &self.base
    }

    pub fn config_file(&self) -> PathBuf {
        self.base.join("config.toml")
    }

    /// # Security Note
    ///
    /// The file holds API keys in plain text; it is created with mode 600.
    pub fn secret_file(&self) -> PathBuf {
        self.base.join("secret.json")
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.base.join("projects")
    }
}
