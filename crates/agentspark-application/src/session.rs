//! Working state of one AgentSpark session.
//!
//! A session is the runtime counterpart of a saved project: the interview
//! transcript, the version store of the generated team and the refinement
//! conversation, which is kept in memory only.

use agentspark_core::agent::{Agent, FileMap};
use agentspark_core::catalog::ModelConfig;
use agentspark_core::config::{DEFAULT_MAX_QUESTIONS, InterviewSection};
use agentspark_core::level::Level;
use agentspark_core::project::{ChatMessage, ChatRole, ProjectRecord, ProjectSnapshot};
use agentspark_core::version::VersionStore;

#[derive(Debug, Clone)]
pub struct SparkSession {
    pub topic: String,
    pub level: Level,
    /// `en` or `pl`
    pub lang: String,
    /// Team size shown to the model, e.g. `3-4`
    pub agent_count: String,
    pub max_questions: u32,
    /// Answers given so far
    pub question_count: u32,
    pub interview_complete: bool,
    pub chat_history: Vec<ChatMessage>,
    pub refine_history: Vec<ChatMessage>,
    pub versions: VersionStore,
    /// Set once the session has been saved as a project
    pub project_id: Option<String>,
}

impl SparkSession {
    pub fn new(topic: impl Into<String>, level: Level, lang: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            level,
            lang: lang.into(),
            agent_count: level.agent_count().to_string(),
            max_questions: DEFAULT_MAX_QUESTIONS,
            question_count: 0,
            interview_complete: false,
            chat_history: Vec::new(),
            refine_history: Vec::new(),
            versions: VersionStore::new(),
            project_id: None,
        }
    }

    /// New session using the `[interview]` defaults from `config.toml`.
    pub fn from_config(topic: impl Into<String>, interview: &InterviewSection) -> Self {
        Self::new(topic, interview.level, interview.lang.clone())
            .with_max_questions(interview.max_questions)
    }

    pub fn with_max_questions(mut self, max_questions: u32) -> Self {
        self.max_questions = max_questions.max(1);
        self
    }

    pub fn with_agent_count(mut self, agent_count: impl Into<String>) -> Self {
        self.agent_count = agent_count.into();
        self
    }

    /// Resumes a saved project. The interview counts as finished when the
    /// project already holds a team.
    pub fn from_record(record: &ProjectRecord) -> Self {
        let snapshot = &record.snapshot;
        let answers = snapshot
            .chat_history
            .iter()
            .filter(|m| m.role == ChatRole::User)
            .count() as u32;

        let mut session = Self::new(snapshot.topic.clone(), snapshot.level, snapshot.lang.clone());
        session.question_count = answers;
        session.interview_complete = !snapshot.agents.is_empty();
        session.chat_history = snapshot.chat_history.clone();
        session.versions = snapshot.version_store();
        session.project_id = Some(record.id.clone());
        session
    }

    /// Model-facing name of the session language.
    pub fn language(&self) -> &'static str {
        match self.lang.as_str() {
            "pl" => "Polish",
            _ => "English",
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.versions.working().agents
    }

    pub fn files(&self) -> &FileMap {
        &self.versions.working().files
    }

    pub fn has_team(&self) -> bool {
        !self.agents().is_empty()
    }

    /// Interview transcript, one `User:`/`AgentSpark:` line per message.
    pub fn transcript(&self) -> String {
        self.chat_history
            .iter()
            .map(ChatMessage::transcript_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Snapshot for persistence; `model` records which model built the team.
    pub fn to_snapshot(&self, model: Option<&ModelConfig>) -> ProjectSnapshot {
        let mut snapshot = ProjectSnapshot {
            topic: self.topic.clone(),
            level: self.level,
            lang: self.lang.clone(),
            model_provider: model.map(|m| m.provider),
            model_id: model.map(|m| m.model_id.clone()),
            chat_history: self.chat_history.clone(),
            ..Default::default()
        };
        snapshot.update_from_store(&self.versions);
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentspark_core::catalog::Provider;
    use chrono::Utc;

    fn team() -> Vec<Agent> {
        vec![Agent {
            id: "pm".into(),
            name: "Product Manager".into(),
            ..Default::default()
        }]
    }

    #[test]
    fn test_new_session_follows_level() {
        let session = SparkSession::new("Bakery CRM", Level::Pozar, "en");
        assert_eq!(session.agent_count, "4-5");
        assert_eq!(session.max_questions, DEFAULT_MAX_QUESTIONS);
        assert_eq!(session.language(), "English");
        assert!(!session.has_team());

        let session = SparkSession::new("x", Level::Iskra, "pl").with_max_questions(0);
        assert_eq!(session.max_questions, 1);
        assert_eq!(session.language(), "Polish");
    }

    #[test]
    fn test_snapshot_and_resume() {
        let mut session = SparkSession::new("Bakery CRM", Level::Plomien, "pl");
        session.chat_history.push(ChatMessage::ai("Who are your users?"));
        session.chat_history.push(ChatMessage::user("A) Bakers"));
        session
            .versions
            .commit_origin(&team(), &FileMap::new(), "Original team — Bakery CRM");

        let model = ModelConfig::new(
            Provider::Gemini,
            "gemini-2.0-flash",
            "https://example.test/{model}",
            "gemini",
            "Gemini Flash",
        );
        let snapshot = session.to_snapshot(Some(&model));
        assert_eq!(snapshot.model_provider, Some(Provider::Gemini));
        assert_eq!(snapshot.model_id.as_deref(), Some("gemini-2.0-flash"));
        assert_eq!(snapshot.agents, team());
        assert_eq!(snapshot.version_history.len(), 1);

        let record = ProjectRecord::new("proj_1_abcde", snapshot, Utc::now());
        let resumed = SparkSession::from_record(&record);
        assert_eq!(resumed.project_id.as_deref(), Some("proj_1_abcde"));
        assert_eq!(resumed.question_count, 1);
        assert!(resumed.interview_complete);
        assert_eq!(resumed.agents(), team().as_slice());
        assert_eq!(resumed.versions.len(), 1);
        assert!(resumed.refine_history.is_empty());
        assert_eq!(
            resumed.transcript(),
            "AgentSpark: Who are your users?\nUser: A) Bakers"
        );
    }
}
