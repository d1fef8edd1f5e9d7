//! Assembly of the drivers around one orchestrator.

use crate::error::Result;
use crate::generation::GenerationDriver;
use crate::interview::InterviewDriver;
use crate::project_usecase::ProjectUseCase;
use crate::refinement::RefinementDriver;
use crate::scoring::ScoringDriver;
use agentspark_core::ProviderAdapter;
use agentspark_core::catalog::ModelCatalog;
use agentspark_core::config::AppConfig;
use agentspark_core::project::ProjectRepository;
use agentspark_core::trace::SpanRecorder;
use agentspark_interaction::{InferenceOrchestrator, RequestDefaults};
use std::sync::Arc;

/// Builds the orchestrator described by `config`: primary model from
/// `[model]`, fallback policy from `[fallback]`, sampling from
/// `[generation]`.
pub fn build_orchestrator(
    config: &AppConfig,
    adapter: Arc<dyn ProviderAdapter>,
    catalog: ModelCatalog,
    recorder: Arc<SpanRecorder>,
    api_key: Option<String>,
) -> Result<InferenceOrchestrator> {
    let primary = catalog.primary_for(&config.model.chain_tag, config.model.model_id.as_deref())?;
    tracing::debug!(
        "[Services] Primary model {} ({})",
        primary.model_id,
        primary.chain_tag
    );

    let mut orchestrator = InferenceOrchestrator::new(adapter, catalog, recorder, primary)
        .with_policy(config.fallback_policy())
        .with_request_defaults(RequestDefaults {
            temperature: config.generation.temperature,
            max_output_tokens: config.generation.max_output_tokens,
        });
    if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
        orchestrator = orchestrator.with_api_key(key);
    }
    Ok(orchestrator)
}

/// Every driver plus the project use case, sharing one orchestrator and
/// therefore one call trace.
pub struct SparkServices {
    pub orchestrator: Arc<InferenceOrchestrator>,
    pub interview: InterviewDriver,
    pub generation: GenerationDriver,
    pub refinement: RefinementDriver,
    pub scoring: ScoringDriver,
    pub projects: ProjectUseCase,
}

impl SparkServices {
    pub fn new(
        orchestrator: Arc<InferenceOrchestrator>,
        repository: Arc<dyn ProjectRepository>,
    ) -> Self {
        Self {
            interview: InterviewDriver::new(orchestrator.clone()),
            generation: GenerationDriver::new(orchestrator.clone()),
            refinement: RefinementDriver::new(orchestrator.clone()),
            scoring: ScoringDriver::new(orchestrator.clone()),
            projects: ProjectUseCase::new(repository),
            orchestrator,
        }
    }
}
