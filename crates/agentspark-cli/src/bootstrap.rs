use std::path::Path;
use std::sync::Arc;

use agentspark_application::{AppError, SparkServices, build_orchestrator};
use agentspark_core::catalog::ModelConfig;
use agentspark_core::InferenceError;
use agentspark_core::config::AppConfig;
use agentspark_core::secret::{SecretService, env_var_for};
use agentspark_core::trace::SpanRecorder;
use agentspark_infrastructure::{
    AgentSparkPaths, ConfigService, JsonProjectRepository, SecretServiceImpl,
};
use agentspark_interaction::{ProviderRouter, builtin_catalog};
use anyhow::{Result, anyhow};
use tokio::sync::mpsc;

use crate::render;

/// Model selection given on the command line.
#[derive(Debug, Default)]
pub struct ModelOverrides {
    pub chain: Option<String>,
    pub model: Option<String>,
}

impl ModelOverrides {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(chain) = &self.chain {
            config.model.chain_tag = chain.clone();
            config.model.model_id = None;
        }
        if let Some(model) = &self.model {
            // A bare model id selects its own chain
            if self.chain.is_none()
                && let Some(found) = builtin_catalog().find(model)
            {
                config.model.chain_tag = found.chain_tag.clone();
            }
            config.model.model_id = Some(model.clone());
        }
    }
}

pub struct AppBootstrap {
    pub paths: AgentSparkPaths,
    pub config: AppConfig,
    pub services: SparkServices,
    secret_path: std::path::PathBuf,
}

impl AppBootstrap {
    pub async fn init(config_dir: Option<&Path>, overrides: &ModelOverrides) -> Result<Self> {
        let paths = AgentSparkPaths::new(config_dir)
            .map_err(|e| anyhow!("Failed to resolve config directory: {}", e))?;

        let config_service = ConfigService::from_paths(&paths);
        let mut config = config_service
            .get_config()
            .await
            .map_err(|e| anyhow!("Failed to load {}: {}", config_service.path().display(), e))?;
        overrides.apply(&mut config);

        let secret_service = SecretServiceImpl::from_paths(&paths);
        secret_service.ensure_secret_file().await?;
        let api_key = secret_service.api_key_for(&config.model.chain_tag).await?;

        let router = ProviderRouter::with_timeout(config.request_timeout())?;
        let (notice_tx, mut notice_rx) = mpsc::unbounded_channel();
        let orchestrator = build_orchestrator(
            &config,
            Arc::new(router),
            builtin_catalog().clone(),
            Arc::new(SpanRecorder::new()),
            api_key,
        )?
        .with_notices(notice_tx);

        tokio::spawn(async move {
            while let Some(notice) = notice_rx.recv().await {
                render::notice(&notice);
            }
        });

        let repository = JsonProjectRepository::new(paths.projects_dir()).await?;
        tracing::debug!(
            "[Bootstrap] Config dir {}, chain {}",
            paths.config_dir().display(),
            config.model.chain_tag
        );

        Ok(Self {
            secret_path: secret_service.path().to_path_buf(),
            paths,
            config,
            services: SparkServices::new(Arc::new(orchestrator), Arc::new(repository)),
        })
    }

    pub async fn selected_model(&self) -> ModelConfig {
        self.services.orchestrator.selected_model().await
    }

    /// Turns an application error into a user-facing one, pointing at the
    /// secret file when the key is missing.
    pub fn explain(&self, err: AppError) -> anyhow::Error {
        match &err {
            AppError::Inference(InferenceError::Config(_)) => {
                anyhow!("{}\nRun `agentspark models` to list the known chains", err)
            }
            AppError::Inference(InferenceError::MissingApiKey { .. }) => {
                let chain = &self.config.model.chain_tag;
                let env_hint = env_var_for(chain)
                    .map(|var| format!(" or set {var}"))
                    .unwrap_or_default();
                anyhow!(
                    "{}\nAdd a '{}' key to {}{}",
                    err,
                    chain,
                    self.secret_path.display(),
                    env_hint
                )
            }
            _ => err.into(),
        }
    }
}
