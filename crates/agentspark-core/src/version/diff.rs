//! Agent-level diffing between two teams.

use super::model::VersionDiff;
use crate::agent::Agent;
use std::collections::BTreeMap;

/// Result of comparing two agent lists.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AgentDiff {
    pub diff: VersionDiff,
    /// Names of removed agents, captured from the previous list
    pub removed_agent_names: BTreeMap<String, String>,
}

/// Compares `previous` with `next` by agent id.
///
/// `added` and `changed` follow the order of `next`, `removed` the order of
/// `previous`. An agent counts as changed when any field differs, unknown
/// fields included.
pub fn diff_agents(previous: &[Agent], next: &[Agent]) -> AgentDiff {
    let find = |list: &[Agent], id: &str| list.iter().position(|a| a.id == id);

    let mut result = AgentDiff::default();

    for agent in next {
        match find(previous, &agent.id) {
            None => result.diff.added.push(agent.id.clone()),
            Some(idx) if previous[idx] != *agent => result.diff.changed.push(agent.id.clone()),
            Some(_) => {}
        }
    }

    for agent in previous {
        if find(next, &agent.id).is_none() {
            result.diff.removed.push(agent.id.clone());
            result
                .removed_agent_names
                .insert(agent.id.clone(), agent.display_name().to_string());
        }
    }

    result
}

/// id to name map for a team.
pub fn agent_names(agents: &[Agent]) -> BTreeMap<String, String> {
    agents
        .iter()
        .map(|a| (a.id.clone(), a.name.clone()))
        .collect()
}
