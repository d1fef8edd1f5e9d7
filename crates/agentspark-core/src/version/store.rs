//! In-memory version history with a live working state.

use super::diff::{AgentDiff, agent_names, diff_agents};
use super::model::{TeamSnapshot, Version, VersionDiff};
use crate::agent::{Agent, FileMap};
use crate::error::{Result, SparkError};
use chrono::{DateTime, Utc};

/// Ordered history of team versions plus the team currently being edited.
///
/// Every payload entering or leaving the store is copied; callers never
/// share data with stored versions.
#[derive(Debug, Clone, Default)]
pub struct VersionStore {
    history: Vec<Version>,
    working: TeamSnapshot,
    /// Pre-refinement states, most recent last
    refine_snapshots: Vec<TeamSnapshot>,
    last_id: i64,
}

impl VersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from persisted history and working state.
    ///
    /// Refinement snapshots are not persisted, so a reloaded store cannot
    /// revert refinements made before it was saved.
    pub fn from_parts(history: Vec<Version>, working: TeamSnapshot) -> Self {
        let last_id = history.iter().map(|v| v.id).max().unwrap_or(0);
        Self {
            history,
            working,
            refine_snapshots: Vec::new(),
            last_id,
        }
    }

    /// Clears the history and records `agents`/`files` as version 1.
    pub fn commit_origin(
        &mut self,
        agents: &[Agent],
        files: &FileMap,
        label: impl Into<String>,
    ) -> &Version {
        self.commit_origin_at(agents, files, label, Utc::now())
    }

    /// Same as [`Self::commit_origin`] with an explicit creation time, used
    /// when importing a shared team.
    pub fn commit_origin_at(
        &mut self,
        agents: &[Agent],
        files: &FileMap,
        label: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> &Version {
        self.history.clear();
        self.refine_snapshots.clear();
        self.working = TeamSnapshot::new(agents.to_vec(), files.clone());

        let version = Version {
            id: self.next_id(),
            label: label.into(),
            created_at,
            agents: agents.to_vec(),
            files: files.clone(),
            diff: VersionDiff::default(),
            removed_agent_names: Default::default(),
            agent_names: agent_names(agents),
            version_number: 1,
            is_origin: true,
        };
        tracing::debug!(agents = agents.len(), "[VersionStore] Origin committed");
        self.push(version)
    }

    /// Appends a refined team, diffed against the latest version.
    ///
    /// The working state before the call is kept so that
    /// [`Self::revert_last_refinement`] can bring it back.
    pub fn commit_refinement(
        &mut self,
        agents: &[Agent],
        files: &FileMap,
        label: impl Into<String>,
    ) -> Result<&Version> {
        let latest = self
            .latest()
            .ok_or_else(|| SparkError::history("cannot refine before an origin version exists"))?;

        let AgentDiff {
            diff,
            removed_agent_names,
        } = diff_agents(&latest.agents, agents);
        let version_number = latest.version_number + 1;

        let previous = std::mem::replace(
            &mut self.working,
            TeamSnapshot::new(agents.to_vec(), files.clone()),
        );
        self.refine_snapshots.push(previous);

        let version = Version {
            id: self.next_id(),
            label: label.into(),
            created_at: Utc::now(),
            agents: agents.to_vec(),
            files: files.clone(),
            diff,
            removed_agent_names,
            agent_names: agent_names(agents),
            version_number,
            is_origin: false,
        };
        tracing::debug!(
            version = version_number,
            changes = version.diff.len(),
            "[VersionStore] Refinement committed"
        );
        Ok(self.push(version))
    }

    /// Makes version `index` (0-based) the working state.
    ///
    /// Unless it already is the latest version, a copy of it is appended
    /// first as `Restored vN`, so history is never rewound.
    pub fn restore(&mut self, index: usize) -> Result<&TeamSnapshot> {
        let target = self.history.get(index).ok_or_else(|| {
            SparkError::history(format!(
                "version index {index} out of range (history has {})",
                self.history.len()
            ))
        })?;
        let payload = target.snapshot();
        let restored_number = target.version_number;

        if index + 1 != self.history.len() {
            let version = Version {
                id: self.next_id(),
                label: format!("Restored v{restored_number}"),
                created_at: Utc::now(),
                agents: payload.agents.clone(),
                files: payload.files.clone(),
                diff: VersionDiff::default(),
                removed_agent_names: Default::default(),
                agent_names: agent_names(&payload.agents),
                version_number: self.history.len() as u32 + 1,
                is_origin: false,
            };
            self.push(version);
        }

        tracing::debug!(version = restored_number, "[VersionStore] Restored");
        self.working = payload;
        Ok(&self.working)
    }

    /// Undoes the most recent refinement of the working state.
    ///
    /// Only the working state changes; the refinement's version stays in
    /// history.
    pub fn revert_last_refinement(&mut self) -> Result<&TeamSnapshot> {
        let snapshot = self
            .refine_snapshots
            .pop()
            .ok_or_else(|| SparkError::history("no refinement to revert"))?;
        self.working = snapshot;
        Ok(&self.working)
    }

    /// Diff from version `from` to version `to` (0-based indices).
    pub fn compare(&self, from: usize, to: usize) -> Result<AgentDiff> {
        let get = |index: usize| {
            self.history
                .get(index)
                .ok_or_else(|| SparkError::history(format!("version index {index} out of range")))
        };
        Ok(diff_agents(&get(from)?.agents, &get(to)?.agents))
    }

    pub fn versions(&self) -> &[Version] {
        &self.history
    }

    pub fn get(&self, index: usize) -> Option<&Version> {
        self.history.get(index)
    }

    pub fn latest(&self) -> Option<&Version> {
        self.history.last()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn working(&self) -> &TeamSnapshot {
        &self.working
    }

    pub fn can_revert(&self) -> bool {
        !self.refine_snapshots.is_empty()
    }

    /// Drops history, snapshots and the working state.
    pub fn clear(&mut self) {
        self.history.clear();
        self.refine_snapshots.clear();
        self.working = TeamSnapshot::default();
    }

    fn push(&mut self, version: Version) -> &Version {
        self.history.push(version);
        &self.history[self.history.len() - 1]
    }

    /// Millisecond timestamp, bumped past the previous id when the clock
    /// has not moved.
    fn next_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_id = now.max(self.last_id + 1);
        self.last_id
    }
}
