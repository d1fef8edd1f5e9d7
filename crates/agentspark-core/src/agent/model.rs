//! Agent domain model.
//!
//! Agents are produced by the generation and refinement drivers from model
//! output. The rest of the domain treats them as opaque payloads that are
//! copied, compared by id, and compared structurally for change detection.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Generated files keyed by filename (`agent-<id>.md`, `README.md`, ...).
pub type FileMap = BTreeMap<String, String>;

/// Broad category of an agent.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    /// Engineering-facing specialist
    Technical,
    /// Everything that is not technical
    #[default]
    #[serde(other)]
    Business,
}

/// A generated agent persona.
///
/// Field names on the wire follow the JSON the models are asked to produce
/// (`agentMd`, `skillMd`). Unknown fields are kept in `extra` so that a
/// round-trip through the version history never drops data, and so that
/// structural comparison sees every field.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Stable identifier used for diffing across versions
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default, rename = "type")]
    pub agent_type: AgentType,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub description: String,
    /// Markdown knowledge document
    #[serde(default, rename = "agentMd", alias = "agentDoc")]
    pub agent_doc: String,
    /// Markdown skill document
    #[serde(default, rename = "skillMd", alias = "skillDoc")]
    pub skill_doc: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Agent {
    /// Name to show for this agent, falling back to the id when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Filename of the agent's knowledge document.
    pub fn agent_file_name(&self) -> String {
        agent_file_name(&self.id)
    }

    /// Filename of the agent's skill document.
    pub fn skill_file_name(&self) -> String {
        skill_file_name(&self.id)
    }

    pub fn is_technical(&self) -> bool {
        self.agent_type == AgentType::Technical
    }
}

pub fn agent_file_name(id: &str) -> String {
    format!("agent-{id}.md")
}

pub fn skill_file_name(id: &str) -> String {
    format!("skill-{id}.md")
}
