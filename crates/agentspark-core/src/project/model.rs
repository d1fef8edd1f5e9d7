//! Project domain model.
//!
//! A project is everything needed to resume work on a generated team: the
//! interview transcript, the current team and its full version history.

use crate::agent::{Agent, FileMap};
use crate::catalog::Provider;
use crate::level::Level;
use crate::version::{TeamSnapshot, Version, VersionStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speaker of a chat message.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    #[serde(other)]
    Ai,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Ai,
            text: text.into(),
        }
    }

    /// Transcript line as fed back to the model.
    pub fn transcript_line(&self) -> String {
        match self.role {
            ChatRole::User => format!("User: {}", self.text),
            ChatRole::Ai => format!("AgentSpark: {}", self.text),
        }
    }
}

/// Serializable state of one project.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub level: Level,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default)]
    pub model_provider: Option<Provider>,
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub files: FileMap,
    #[serde(default)]
    pub version_history: Vec<Version>,
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
}

fn default_lang() -> String {
    "en".to_string()
}

impl ProjectSnapshot {
    /// Rebuilds the version store; the saved team becomes the working state.
    pub fn version_store(&self) -> VersionStore {
        VersionStore::from_parts(
            self.version_history.clone(),
            TeamSnapshot::new(self.agents.clone(), self.files.clone()),
        )
    }

    /// Copies the working team and history out of `store`.
    pub fn update_from_store(&mut self, store: &VersionStore) {
        let working = store.working();
        self.agents = working.agents.clone();
        self.files = working.files.clone();
        self.version_history = store.versions().to_vec();
    }

    pub fn transcript(&self) -> String {
        self.chat_history
            .iter()
            .map(ChatMessage::transcript_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Name used when a project has no topic yet.
pub fn project_name(topic: &str) -> String {
    if topic.trim().is_empty() {
        "Untitled Project".to_string()
    } else {
        topic.to_string()
    }
}

/// A stored project: identity, timestamps and the snapshot itself.
///
/// The snapshot fields are flattened, so the JSON layout is a single object.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// `proj_<millis>_<suffix>`
    pub id: String,
    pub name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub snapshot: ProjectSnapshot,
}

/// Timestamps are stored with millisecond precision.
fn to_millis(time: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(time.timestamp_millis()).unwrap_or(time)
}

impl ProjectRecord {
    pub fn new(id: impl Into<String>, snapshot: ProjectSnapshot, now: DateTime<Utc>) -> Self {
        let now = to_millis(now);
        Self {
            id: id.into(),
            name: project_name(&snapshot.topic),
            created_at: now,
            updated_at: now,
            snapshot,
        }
    }

    /// Replaces the snapshot, renaming after the topic and bumping `updated_at`.
    pub fn update(&mut self, snapshot: ProjectSnapshot, now: DateTime<Utc>) {
        self.name = project_name(&snapshot.topic);
        self.snapshot = snapshot;
        self.updated_at = to_millis(now);
    }

    /// Copy under a new id, named `<name> (copy)`.
    pub fn fork(&self, id: impl Into<String>, now: DateTime<Utc>) -> Self {
        let now = to_millis(now);
        Self {
            id: id.into(),
            name: format!("{} (copy)", self.name),
            created_at: now,
            updated_at: now,
            snapshot: self.snapshot.clone(),
        }
    }
}
