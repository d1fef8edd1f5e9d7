//! Version domain model.
//!
//! Field names match the project files written by earlier releases.
//! `ts`, `removedNames` and `vNum` are accepted on load and written back
//! under their current names.

use crate::agent::{Agent, FileMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Agent ids that changed between two consecutive versions.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionDiff {
    #[serde(default)]
    pub added: Vec<String>,
    #[serde(default)]
    pub removed: Vec<String>,
    #[serde(default)]
    pub changed: Vec<String>,
}

impl VersionDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// Total number of touched agents.
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }
}

/// Agents plus generated files, the payload every version carries.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct TeamSnapshot {
    #[serde(default)]
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub files: FileMap,
}

impl TeamSnapshot {
    pub fn new(agents: Vec<Agent>, files: FileMap) -> Self {
        Self { agents, files }
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty() && self.files.is_empty()
    }
}

/// An immutable snapshot of the generated team at one point in history.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    /// Creation timestamp in milliseconds, unique within a history
    pub id: i64,
    /// Short description of what changed
    pub label: String,
    #[serde(alias = "ts")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub files: FileMap,
    #[serde(default)]
    pub diff: VersionDiff,
    /// Names of agents removed in this step, keyed by id
    #[serde(default, alias = "removedNames")]
    pub removed_agent_names: BTreeMap<String, String>,
    /// id to name for every agent in this version
    #[serde(default)]
    pub agent_names: BTreeMap<String, String>,
    /// 1-based position in the history
    #[serde(alias = "vNum")]
    pub version_number: u32,
    #[serde(default)]
    pub is_origin: bool,
}

impl Version {
    /// Copy of this version's payload.
    pub fn snapshot(&self) -> TeamSnapshot {
        TeamSnapshot {
            agents: self.agents.clone(),
            files: self.files.clone(),
        }
    }

    /// Display name for an agent id mentioned in this version's diff.
    pub fn name_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.agent_names
            .get(id)
            .or_else(|| self.removed_agent_names.get(id))
            .map(String::as_str)
            .unwrap_or(id)
    }

    /// Marker shown in history listings: `●` for the origin, `vN` otherwise.
    pub fn marker(&self) -> String {
        if self.is_origin {
            "●".to_string()
        } else {
            format!("v{}", self.version_number)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_field_names_are_accepted() {
        let version: Version = serde_json::from_value(json!({
            "id": 1700000000000i64,
            "label": "Original team — CRM",
            "ts": "2024-01-01T10:00:00.000Z",
            "agents": [{ "id": "a", "name": "Alpha" }],
            "files": { "README.md": "# CRM" },
            "diff": { "added": [], "removed": [], "changed": [] },
            "removedNames": { "z": "Zed" },
            "agentNames": { "a": "Alpha" },
            "vNum": 1,
            "isOrigin": true
        }))
        .unwrap();

        assert_eq!(version.version_number, 1);
        assert!(version.is_origin);
        assert_eq!(version.removed_agent_names["z"], "Zed");
        assert_eq!(version.name_of("z"), "Zed");
        assert_eq!(version.name_of("a"), "Alpha");
        assert_eq!(version.name_of("q"), "q");
    }

    #[test]
    fn test_serializes_current_field_names() {
        let version = Version {
            id: 1,
            label: "v".into(),
            created_at: Utc::now(),
            agents: vec![],
            files: FileMap::new(),
            diff: VersionDiff::default(),
            removed_agent_names: BTreeMap::new(),
            agent_names: BTreeMap::new(),
            version_number: 2,
            is_origin: false,
        };
        let value = serde_json::to_value(&version).unwrap();
        for key in [
            "createdAt",
            "removedAgentNames",
            "agentNames",
            "versionNumber",
            "isOrigin",
            "diff",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(version.marker(), "v2");
    }
}
