//! Conversational refinement of a generated team.
//!
//! A refinement is a two-step affair: [`RefinementDriver::propose`] asks the
//! model for an updated team and previews the changes, and
//! [`RefinementDriver::apply`] commits the proposal as a new version.
//! Dropping the [`PendingRefinement`] discards it.

use crate::error::{AppError, Result};
use crate::generation::TeamReply;
use crate::prompts;
use crate::reply::split_refine_reply;
use crate::session::SparkSession;
use crate::team_files::{README_FILE, TEAM_CONFIG_FILE, agent_doc, readme, skill_doc};
use agentspark_core::SparkError;
use agentspark_core::agent::{Agent, agent_file_name, skill_file_name};
use agentspark_core::project::ChatMessage;
use agentspark_core::version::{AgentDiff, Version, diff_agents};
use agentspark_interaction::InferenceOrchestrator;
use chrono::Utc;
use std::sync::Arc;
use strum::{Display, EnumIter, EnumString};

/// Version labels longer than this are shortened.
const LABEL_MAX_CHARS: usize = 60;
const LABEL_KEEP_CHARS: usize = 57;

/// Preset intents offered alongside a free-text request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RefineAction {
    /// General improvements to all agents
    Improve,
    /// Add a new specialist
    Add,
    /// Remove or merge an agent
    Remove,
    /// Reroute how agents communicate
    Connections,
}

/// An updated team proposed by the model, not yet applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRefinement {
    /// The request as typed; becomes the version label
    pub request: String,
    /// The request as sent, including any action prefix
    pub full_request: String,
    pub summary: String,
    pub agents: Vec<Agent>,
    pub team_config: Option<String>,
    /// Changes relative to the session's current team
    pub preview: AgentDiff,
}

pub struct RefinementDriver {
    orchestrator: Arc<InferenceOrchestrator>,
}

impl RefinementDriver {
    pub fn new(orchestrator: Arc<InferenceOrchestrator>) -> Self {
        Self { orchestrator }
    }

    /// Asks the model to apply `request` to the current team.
    pub async fn propose(
        &self,
        session: &SparkSession,
        request: &str,
        action: Option<RefineAction>,
    ) -> Result<PendingRefinement> {
        let request = request.trim();
        if request.is_empty() {
            return Err(AppError::invalid_state("Refine request must not be empty"));
        }
        if !session.has_team() {
            return Err(AppError::invalid_state("Generate a team before refining it"));
        }

        let full_request = match action {
            Some(action) => format!("[Action: {action}] {request}"),
            None => request.to_string(),
        };
        let system = prompts::refine_system(session)?;
        let message = prompts::refine_user(session, &full_request)?;
        let label = format!("Refine · v{}", session.versions.len() + 1);
        let raw = self
            .orchestrator
            .run_inference_call(&system, &message, Some(&label))
            .await?;

        let parts = split_refine_reply(&raw)
            .ok_or_else(|| SparkError::parse("Could not parse updated team."))?;
        let reply: TeamReply = serde_json::from_str(parts.json)
            .map_err(|e| SparkError::parse(format!("Could not parse updated team: {e}")))?;

        let preview = diff_agents(session.agents(), &reply.agents);
        tracing::info!(
            "[RefinementDriver] Proposal: +{} -{} ~{}",
            preview.diff.added.len(),
            preview.diff.removed.len(),
            preview.diff.changed.len()
        );
        Ok(PendingRefinement {
            request: request.to_string(),
            full_request,
            summary: parts.summary,
            agents: reply.agents,
            team_config: reply.team_config,
            preview,
        })
    }

    /// Commits `pending` as a new version of the session's team.
    pub fn apply(session: &mut SparkSession, pending: PendingRefinement) -> Result<Version> {
        let mut files = session.files().clone();
        for agent in &pending.agents {
            files.insert(agent.agent_file_name(), agent_doc(agent));
            files.insert(agent.skill_file_name(), skill_doc(agent));
        }
        let removed = diff_agents(session.agents(), &pending.agents).diff.removed;
        for id in &removed {
            files.remove(&agent_file_name(id));
            files.remove(&skill_file_name(id));
        }
        if let Some(config) = pending.team_config.as_deref().filter(|c| !c.trim().is_empty()) {
            files.insert(TEAM_CONFIG_FILE.to_string(), config.to_string());
        }
        let overview = readme(session, &pending.agents, &files, Utc::now())?;
        files.insert(README_FILE.to_string(), overview);

        let version = session
            .versions
            .commit_refinement(&pending.agents, &files, version_label(&pending.request))?
            .clone();
        session
            .refine_history
            .push(ChatMessage::user(pending.full_request));
        session.refine_history.push(ChatMessage::ai(pending.summary));
        tracing::info!(
            "[RefinementDriver] Applied v{} ({} changes)",
            version.version_number,
            version.diff.len()
        );
        Ok(version)
    }

    /// Undoes the last applied refinement of this session.
    ///
    /// History is left alone; only the working team and the refine
    /// conversation go back.
    pub fn revert_last(session: &mut SparkSession) -> Result<()> {
        session.versions.revert_last_refinement()?;
        let keep = session.refine_history.len().saturating_sub(2);
        session.refine_history.truncate(keep);
        tracing::info!("[RefinementDriver] Reverted last refinement");
        Ok(())
    }
}

/// The request, cut to 57 characters plus `…` when longer than 60.
pub fn version_label(request: &str) -> String {
    if request.chars().count() > LABEL_MAX_CHARS {
        let kept: String = request.chars().take(LABEL_KEEP_CHARS).collect();
        format!("{kept}…")
    } else {
        request.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_label() {
        assert_eq!(version_label("Add QA"), "Add QA");
        let exact = "x".repeat(60);
        assert_eq!(version_label(&exact), exact);
        let long = "y".repeat(61);
        assert_eq!(version_label(&long), format!("{}…", "y".repeat(57)));
    }

    #[test]
    fn test_refine_action_round_trip() {
        assert_eq!("Add".parse::<RefineAction>().unwrap(), RefineAction::Add);
        assert_eq!(RefineAction::Connections.to_string(), "connections");
        assert!("merge".parse::<RefineAction>().is_err());
    }
}
