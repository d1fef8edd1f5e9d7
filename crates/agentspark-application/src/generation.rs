//! Builds the agent team from a finished interview.

use crate::error::{AppError, Result};
use crate::prompts;
use crate::reply::parse_json_object;
use crate::session::SparkSession;
use crate::team_files::build_team_files;
use agentspark_core::SparkError;
use agentspark_core::agent::Agent;
use agentspark_core::version::Version;
use agentspark_interaction::InferenceOrchestrator;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

/// Team JSON as produced by the generation and refine prompts.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TeamReply {
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub team_config: Option<String>,
}

pub struct GenerationDriver {
    orchestrator: Arc<InferenceOrchestrator>,
}

impl GenerationDriver {
    pub fn new(orchestrator: Arc<InferenceOrchestrator>) -> Self {
        Self { orchestrator }
    }

    /// Generates the team and commits it as the session's origin version.
    ///
    /// Any previous history of the session is replaced.
    pub async fn generate(&self, session: &mut SparkSession) -> Result<Version> {
        if session.chat_history.is_empty() {
            return Err(AppError::invalid_state(
                "Run the interview before generating a team",
            ));
        }

        let system = prompts::generation_system(session)?;
        let message = prompts::generation_user(session)?;
        let label = format!(
            "Generate Team · {} agents · {}",
            session.agent_count, session.level
        );
        let raw = self
            .orchestrator
            .run_inference_call(&system, &message, Some(&label))
            .await?;

        let reply: TeamReply = parse_json_object(&raw)
            .ok_or_else(|| SparkError::parse("Could not parse agent data"))?;
        if reply.agents.is_empty() {
            return Err(SparkError::parse("The generated team has no agents").into());
        }

        let files = build_team_files(
            session,
            &reply.agents,
            reply.team_config.as_deref(),
            Utc::now(),
        )?;
        session.interview_complete = true;
        session.refine_history.clear();
        let version = session.versions.commit_origin(
            &reply.agents,
            &files,
            format!("Original team — {}", session.topic),
        );
        tracing::info!(
            "[GenerationDriver] Generated {} agents for {}",
            version.agents.len(),
            session.topic
        );
        Ok(version.clone())
    }
}
