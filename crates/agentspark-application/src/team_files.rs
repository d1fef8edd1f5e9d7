//! Generated markdown files for a team.
//!
//! Models are asked to write `agentMd`, `skillMd` and `teamConfig`
//! themselves; when they leave one out a short stand-in is generated here.

use crate::error::Result;
use crate::session::SparkSession;
use agentspark_core::agent::{Agent, FileMap};
use chrono::{DateTime, Utc};
use minijinja::{Environment, context};
use once_cell::sync::Lazy;

pub const README_FILE: &str = "README.md";
pub const TEAM_CONFIG_FILE: &str = "team-config.md";

static ENV: Lazy<Environment<'static>> = Lazy::new(Environment::new);

const README_TEMPLATE: &str = r#"# AgentSpark — Generated Team

**Project:** {{ topic }}
**Level:** {{ level_name }}
**Generated:** {{ generated }}
**Language:** {{ lang }}

## ⚙️ Technical Agents

{{ technical }}

## 💼 Business Agents

{{ business }}

## Files

{% for name in files %}- `{{ name }}`
{% endfor %}
## How to use

Copy the agent and skill files into your agent workspace, then start with the team configuration.
"#;

pub fn agent_doc(agent: &Agent) -> String {
    if !agent.agent_doc.trim().is_empty() {
        return agent.agent_doc.clone();
    }
    format!(
        "# Agent: {}\n\n**Role:** {}\n\n{}",
        agent.display_name(),
        agent.role,
        agent.description
    )
}

pub fn skill_doc(agent: &Agent) -> String {
    if !agent.skill_doc.trim().is_empty() {
        return agent.skill_doc.clone();
    }
    format!(
        "# Skill: {}\n\n## Capabilities\n\n{}",
        agent.display_name(),
        agent.description
    )
}

/// Stand-in team configuration listing every agent.
pub fn default_team_config(topic: &str, agents: &[Agent]) -> String {
    let lines: Vec<String> = agents
        .iter()
        .map(|a| {
            let role = if a.role.trim().is_empty() { &a.id } else { &a.role };
            format!("- **{}** ({})", a.display_name(), role)
        })
        .collect();
    format!(
        "# Team Configuration\n\n**Project:** {}\n\n## Agents\n\n{}",
        topic,
        lines.join("\n")
    )
}

fn agent_line(agent: &Agent) -> String {
    let kind = if agent.is_technical() { "TECHNICAL" } else { "BUSINESS" };
    format!(
        "- **{}** [{}] ({}): {}",
        agent.display_name(),
        kind,
        agent.role,
        agent.description
    )
}

/// README overview of the team; lists every file in `files` except itself.
pub fn readme(
    session: &SparkSession,
    agents: &[Agent],
    files: &FileMap,
    now: DateTime<Utc>,
) -> Result<String> {
    let (technical, business): (Vec<&Agent>, Vec<&Agent>) =
        agents.iter().partition(|a| a.is_technical());
    let join = |list: Vec<&Agent>| {
        if list.is_empty() {
            return "none".to_string();
        }
        list.into_iter()
            .map(agent_line)
            .collect::<Vec<_>>()
            .join("\n")
    };
    let listed: Vec<&str> = files
        .keys()
        .map(String::as_str)
        .filter(|name| *name != README_FILE)
        .collect();

    Ok(ENV.render_str(
        README_TEMPLATE,
        context! {
            topic => &session.topic,
            level_name => session.level.display_name(),
            generated => now.format("%Y-%m-%d %H:%M UTC").to_string(),
            lang => session.lang.to_uppercase(),
            technical => join(technical),
            business => join(business),
            files => listed,
        },
    )?)
}

/// Full file set for a freshly generated team.
pub fn build_team_files(
    session: &SparkSession,
    agents: &[Agent],
    team_config: Option<&str>,
    now: DateTime<Utc>,
) -> Result<FileMap> {
    let mut files = FileMap::new();
    for agent in agents {
        files.insert(agent.agent_file_name(), agent_doc(agent));
        files.insert(agent.skill_file_name(), skill_doc(agent));
    }
    let config = match team_config.filter(|c| !c.trim().is_empty()) {
        Some(config) => config.to_string(),
        None => default_team_config(&session.topic, agents),
    };
    files.insert(TEAM_CONFIG_FILE.to_string(), config);
    let readme = readme(session, agents, &files, now)?;
    files.insert(README_FILE.to_string(), readme);
    Ok(files)
}
