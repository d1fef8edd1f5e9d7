//! Secret service implementation.
//!
//! Reads API keys from `secret.json` and falls back to environment
//! variables (`GEMINI_API_KEY`, ...) for chains the file does not cover.

use crate::paths::AgentSparkPaths;
use crate::storage::AtomicFile;
use agentspark_core::Result;
use agentspark_core::secret::{ProviderSecret, SecretConfig, SecretService, env_var_for};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Service for loading API keys.
///
/// The file is read once and cached. Key values never reach the logs.
pub struct SecretServiceImpl {
    file: AtomicFile<SecretConfig>,
    cached: RwLock<Option<SecretConfig>>,
    env: EnvLookup,
}

impl SecretServiceImpl {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicFile::json(path),
            cached: RwLock::new(None),
            env: Box::new(|name| std::env::var(name).ok()),
        }
    }

    pub fn from_paths(paths: &AgentSparkPaths) -> Self {
        Self::new(paths.secret_file())
    }

    /// Replaces the environment lookup.
    pub fn with_env(mut self, env: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Creates `secret.json` with empty keys for every chain when it does not
    /// exist yet. Returns whether a file was written.
    pub async fn ensure_secret_file(&self) -> Result<bool> {
        if self.file.load().await?.is_some() {
            return Ok(false);
        }

        let blank = || {
            Some(ProviderSecret {
                api_key: String::new(),
            })
        };
        let template = SecretConfig {
            gemini: blank(),
            openai: blank(),
            anthropic: blank(),
            mistral: blank(),
            groq: blank(),
        };
        self.file.save(&template).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(self.file.path(), permissions).await?;
        }

        tracing::info!(
            "[SecretService] Created secret template at {}",
            self.file.path().display()
        );
        Ok(true)
    }
}

#[async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let loaded = self.file.load().await?.unwrap_or_default();
        *self.cached.write().await = Some(loaded.clone());
        Ok(loaded)
    }

    async fn api_key_for(&self, chain_tag: &str) -> Result<Option<String>> {
        let secrets = self.load_secrets().await?;
        if let Some(key) = secrets.api_key_for(chain_tag) {
            return Ok(Some(key.to_string()));
        }

        let from_env = env_var_for(chain_tag)
            .and_then(|name| (self.env)(name))
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        if from_env.is_some() {
            tracing::debug!("[SecretService] Using environment key for chain '{chain_tag}'");
        }
        Ok(from_env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_config() {
        let dir = TempDir::new().unwrap();
        let service = SecretServiceImpl::new(dir.path().join("secret.json")).with_env(no_env);

        assert_eq!(service.load_secrets().await.unwrap(), SecretConfig::default());
        assert_eq!(service.api_key_for("gemini").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_key_wins_over_environment() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.json");
        std::fs::write(&path, r#"{ "gemini": { "api_key": "from-file" } }"#).unwrap();
        let service = SecretServiceImpl::new(&path).with_env(|name| {
            matches!(name, "GEMINI_API_KEY" | "GROQ_API_KEY").then(|| "from-env".to_string())
        });

        assert_eq!(
            service.api_key_for("gemini").await.unwrap().as_deref(),
            Some("from-file")
        );
        assert_eq!(
            service.api_key_for("groq").await.unwrap().as_deref(),
            Some("from-env")
        );
        assert_eq!(service.api_key_for("openai").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_blank_environment_key_is_ignored() {
        let dir = TempDir::new().unwrap();
        let service = SecretServiceImpl::new(dir.path().join("secret.json"))
            .with_env(|_| Some("   ".to_string()));
        assert_eq!(service.api_key_for("anthropic").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ensure_secret_file_writes_template_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.json");
        let service = SecretServiceImpl::new(&path).with_env(no_env);

        assert!(service.ensure_secret_file().await.unwrap());
        assert!(!service.ensure_secret_file().await.unwrap());

        let secrets = service.load_secrets().await.unwrap();
        assert!(secrets.mistral.is_some());
        assert_eq!(secrets.api_key_for("mistral"), None);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
