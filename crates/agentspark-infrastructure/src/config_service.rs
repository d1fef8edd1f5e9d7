//! Configuration service implementation.
//!
//! Loads `AppConfig` from `~/.config/agentspark/config.toml` and caches it.

use crate::paths::AgentSparkPaths;
use crate::storage::AtomicFile;
use agentspark_core::Result;
use agentspark_core::config::AppConfig;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Configuration service that loads and caches the application configuration.
///
/// A missing file yields the defaults; a malformed file is an error rather
/// than a silent fallback.
#[derive(Debug)]
pub struct ConfigService {
    file: AtomicFile<AppConfig>,
    cached: RwLock<Option<AppConfig>>,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicFile::toml(path),
            cached: RwLock::new(None),
        }
    }

    pub fn from_paths(paths: &AgentSparkPaths) -> Self {
        Self::new(paths.config_file())
    }

    /// Gets the configuration, loading from file if not cached.
    pub async fn get_config(&self) -> Result<AppConfig> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let loaded = match self.file.load().await? {
            Some(config) => config,
            None => {
                tracing::debug!(
                    "[ConfigService] No config at {}, using defaults",
                    self.file.path().display()
                );
                AppConfig::default()
            }
        };

        *self.cached.write().await = Some(loaded.clone());
        Ok(loaded)
    }

    /// Writes `config` and refreshes the cache.
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        self.file.save(config).await?;
        *self.cached.write().await = Some(config.clone());
        Ok(())
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub async fn invalidate_cache(&self) {
        *self.cached.write().await = None;
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }
}
