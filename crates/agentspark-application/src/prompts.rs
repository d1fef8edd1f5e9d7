//! Prompt templates for the drivers.
//!
//! Templates are Jinja2 (rendered with `minijinja`) so the wording can be
//! edited without touching the surrounding Rust.

use crate::error::Result;
use crate::session::SparkSession;
use agentspark_core::agent::Agent;
use minijinja::{Environment, context};
use once_cell::sync::Lazy;
use serde::Serialize;

static ENV: Lazy<Environment<'static>> = Lazy::new(Environment::new);

const INTERVIEW_SYSTEM: &str = r#"You are AgentSpark, an expert AI system designer. Your job is to interview the user about their app idea using CLOSED questions with multiple choice answers.

Language: {{ language }}
App topic: {{ topic }}
Complexity level: {{ level_name }}
Agent count to generate: {{ agent_count }}
Focus areas for this level: {{ focus }}

INTERVIEW STRUCTURE: {{ max_questions }} questions total, split into 3 adaptive sections.

SECTION 1, BUSINESS (first {{ business_questions }} questions):
Focus: target users, monetization model, core value proposition, market.

SECTION 2, FRONTEND (next {{ frontend_questions }} questions):
Focus: UI paradigm, navigation, key user flows, device targets, design priorities.

SECTION 3, BACKEND (remaining questions):
Focus: data storage, auth, external APIs, scalability, infrastructure.

ADAPTIVE RULES:
- Each question MUST reference or build on previous answers. Never ask in a vacuum.
- Questions must form a coherent decision tree that leads to a buildable specification.
- Calibrate depth to the {{ level_name }} level: {{ focus }}
- Always track what has been decided and reference it explicitly in the next question.

RESPONSE FORMAT: for EVERY question respond with ONLY this JSON:
{
  "section": "Business" | "Frontend" | "Backend",
  "question": "Your question here?",
  "options": [
{%- for label in ["A", "B", "C", "D"] %}
    { "label": "{{ label }}", "text": "Option {{ label }} text", "impact": "1 sentence consequence" }{% if not loop.last %},{% endif %}
{%- endfor %}
  ]
}

After exactly {{ max_questions }} questions respond with ONLY:
{ "complete": true, "summary": "Coherent 3-4 sentence spec summary." }

IMPORTANT: Pure JSON only."#;

const GENERATION_SYSTEM: &str = r#"You are a system architect. Respond with a JSON object ONLY.
Design a team of {{ agent_count }} AI agents for "{{ topic }}" ({{ level_name }} level), written in {{ language }}.
Format: { "agents": [{ "id", "name", "emoji", "type", "role", "description", "agentMd", "skillMd" }], "teamConfig" }
- "type" is "technical" or "business"
- "agentMd" and "skillMd" are full markdown documents
- "teamConfig" is a markdown document describing how the agents work together"#;

const GENERATION_USER: &str = r#"Here is the complete interview:
{{ transcript }}

[GENERATE]
Generate the agent team JSON now based on the interview."#;

const REFINE_SYSTEM: &str = r#"You are AgentSpark, an expert AI system designer in REFINE mode.
Language: {{ language }}
App topic: {{ topic }}
Complexity level: {{ level_name }}

CURRENT TEAM:
{{ team_json }}

The user wants to modify their agent team. Apply their requested changes and return the complete updated team as JSON.

RESPONSE FORMAT, two parts:
1. A brief human-readable summary of what changed (1-3 sentences), tagging changes as +AgentName (new), -AgentName (removed) or ~AgentName (modified).

2. Then the full updated JSON (same format as original generation):
[UPDATED_TEAM]
{
  "agents": [...complete updated agents array with all fields: id, name, emoji, type, role, description, agentMd, skillMd...],
  "teamConfig": "...updated team config md..."
}

RULES:
- Always return the COMPLETE agents array, not just changed agents
- Keep unchanged agents exactly as they are
- New agents must follow same structure (id, name, emoji, type, role, description, agentMd, skillMd)
- type must be "technical" or "business"
- agentMd and skillMd must be full detailed markdown, not placeholders
- The [UPDATED_TEAM] marker must appear on its own line"#;

const REFINE_USER: &str = r#"{% if history %}Previous context:
{% for line in history %}{{ line }}
{% endfor %}
New request: {{ request }}{% else %}Request: {{ request }}{% endif %}"#;

pub(crate) const SCORING_SYSTEM: &str = "You are a scoring bot. Return JSON only.";

const SCORING_USER: &str = r#"As a project analyst, score the following project interview for complexity.
Respond ONLY with JSON: { "overallScore", "overallLabel", "metrics": [{ "label", "value", "color" }], "risks": [], "levelMatch", "suggestedLevel" }.
Interview:
{{ transcript }}"#;

/// Questions in the business and frontend sections; backend gets the rest.
pub(crate) fn section_split(max_questions: u32) -> (u32, u32) {
    let share = |ratio: f64| (f64::from(max_questions) * ratio).ceil() as u32;
    (share(0.3), share(0.35))
}

pub fn interview_system(session: &SparkSession) -> Result<String> {
    let (business_questions, frontend_questions) = section_split(session.max_questions);
    Ok(ENV.render_str(
        INTERVIEW_SYSTEM,
        context! {
            language => session.language(),
            topic => &session.topic,
            level_name => session.level.display_name(),
            agent_count => &session.agent_count,
            focus => session.level.focus(),
            max_questions => session.max_questions,
            business_questions => business_questions,
            frontend_questions => frontend_questions,
        },
    )?)
}

pub fn generation_system(session: &SparkSession) -> Result<String> {
    Ok(ENV.render_str(
        GENERATION_SYSTEM,
        context! {
            language => session.language(),
            topic => &session.topic,
            level_name => session.level.display_name(),
            agent_count => &session.agent_count,
        },
    )?)
}

pub fn generation_user(session: &SparkSession) -> Result<String> {
    Ok(ENV.render_str(
        GENERATION_USER,
        context! { transcript => session.transcript() },
    )?)
}

/// The part of an agent the refine prompt shows the model.
#[derive(Serialize)]
struct AgentOutline<'a> {
    id: &'a str,
    name: &'a str,
    #[serde(rename = "type")]
    agent_type: &'a str,
    role: &'a str,
    description: &'a str,
}

fn team_outline(agents: &[Agent]) -> Result<String> {
    let outline: Vec<AgentOutline<'_>> = agents
        .iter()
        .map(|a| AgentOutline {
            id: &a.id,
            name: &a.name,
            agent_type: if a.is_technical() { "technical" } else { "business" },
            role: &a.role,
            description: &a.description,
        })
        .collect();
    serde_json::to_string_pretty(&outline)
        .map_err(|e| crate::error::AppError::Template(e.to_string()))
}

pub fn refine_system(session: &SparkSession) -> Result<String> {
    Ok(ENV.render_str(
        REFINE_SYSTEM,
        context! {
            language => session.language(),
            topic => &session.topic,
            level_name => session.level.display_name(),
            team_json => team_outline(session.agents())?,
        },
    )?)
}

/// `request` already carries any `[Action: ..]` prefix.
pub fn refine_user(session: &SparkSession, request: &str) -> Result<String> {
    let history: Vec<String> = session
        .refine_history
        .iter()
        .map(|m| match m.role {
            agentspark_core::project::ChatRole::User => format!("User: {}", m.text),
            agentspark_core::project::ChatRole::Ai => format!("AI: {}", m.text),
        })
        .collect();
    Ok(ENV.render_str(REFINE_USER, context! { history => history, request => request })?)
}

pub fn scoring_user(session: &SparkSession) -> Result<String> {
    Ok(ENV.render_str(
        SCORING_USER,
        context! { transcript => session.transcript() },
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentspark_core::level::Level;
    use agentspark_core::project::ChatMessage;

    #[test]
    fn test_section_split() {
        assert_eq!(section_split(6), (2, 3));
        assert_eq!(section_split(10), (3, 4));
        assert_eq!(section_split(1), (1, 1));
    }

    #[test]
    fn test_interview_system_mentions_session() {
        let session = SparkSession::new("Bakery CRM", Level::Plomien, "pl").with_max_questions(6);
        let prompt = interview_system(&session).unwrap();
        assert!(prompt.contains("Language: Polish"));
        assert!(prompt.contains("App topic: Bakery CRM"));
        assert!(prompt.contains("Complexity level: Flame"));
        assert!(prompt.contains("Agent count to generate: 3-4"));
        assert!(prompt.contains("first 2 questions"));
        assert!(prompt.contains("next 3 questions"));
        assert!(prompt.contains(r#"{ "label": "D", "text": "Option D text""#));
        assert!(prompt.contains("After exactly 6 questions"));
    }

    #[test]
    fn test_refine_user_with_and_without_history() {
        let mut session = SparkSession::new("Bakery CRM", Level::Iskra, "en");
        assert_eq!(refine_user(&session, "Add QA").unwrap(), "Request: Add QA");

        session.refine_history.push(ChatMessage::user("Add QA"));
        session.refine_history.push(ChatMessage::ai("+QA Engineer"));
        assert_eq!(
            refine_user(&session, "[Action: remove] Drop QA").unwrap(),
            "Previous context:\nUser: Add QA\nAI: +QA Engineer\n\nNew request: [Action: remove] Drop QA"
        );
    }

    #[test]
    fn test_refine_system_lists_current_team() {
        let mut session = SparkSession::new("Bakery CRM", Level::Iskra, "en");
        let agents = vec![Agent {
            id: "pm".into(),
            name: "Product Manager".into(),
            role: "Owns the roadmap".into(),
            ..Default::default()
        }];
        session
            .versions
            .commit_origin(&agents, &Default::default(), "Original team — Bakery CRM");

        let prompt = refine_system(&session).unwrap();
        assert!(prompt.contains(r#""id": "pm""#));
        assert!(prompt.contains(r#""type": "business""#));
        assert!(prompt.contains("[UPDATED_TEAM]"));
    }

    #[test]
    fn test_generation_user_embeds_transcript() {
        let mut session = SparkSession::new("Bakery CRM", Level::Iskra, "en");
        session.chat_history.push(ChatMessage::user("A) Bakers"));
        assert_eq!(
            generation_user(&session).unwrap(),
            "Here is the complete interview:\nUser: A) Bakers\n\n[GENERATE]\nGenerate the agent team JSON now based on the interview."
        );
    }
}
