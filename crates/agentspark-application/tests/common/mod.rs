#![allow(dead_code)]

use agentspark_application::{SparkServices, SparkSession, build_orchestrator};
use agentspark_core::config::AppConfig;
use agentspark_core::level::Level;
use agentspark_core::project::ChatMessage;
use agentspark_core::trace::SpanRecorder;
use agentspark_infrastructure::JsonProjectRepository;
use agentspark_interaction::{ScriptStep, ScriptedAdapter, builtin_catalog};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

pub struct Harness {
    pub services: SparkServices,
    pub adapter: Arc<ScriptedAdapter>,
    pub dir: TempDir,
}

impl Harness {
    pub async fn new(steps: Vec<ScriptStep>) -> Self {
        let mut config = AppConfig::default();
        config.fallback.cooldown_ms = 0;

        let adapter = Arc::new(ScriptedAdapter::new(steps));
        let orchestrator = build_orchestrator(
            &config,
            adapter.clone(),
            builtin_catalog().clone(),
            Arc::new(SpanRecorder::new()),
            Some("test-key".to_string()),
        )
        .unwrap();

        let dir = TempDir::new().unwrap();
        let repository = JsonProjectRepository::new(dir.path()).await.unwrap();
        Self {
            services: SparkServices::new(Arc::new(orchestrator), Arc::new(repository)),
            adapter,
            dir,
        }
    }

    pub async fn replies(texts: Vec<String>) -> Self {
        Self::new(
            texts
                .into_iter()
                .map(|t| ScriptStep::Reply(agentspark_core::Completion::new(t, None)))
                .collect(),
        )
        .await
    }

    pub async fn span_labels(&self) -> Vec<String> {
        self.services
            .orchestrator
            .recorder()
            .spans()
            .await
            .into_iter()
            .map(|s| s.label)
            .collect()
    }

    pub fn last_user_message(&self) -> String {
        self.adapter
            .calls()
            .last()
            .map(|c| c.request.user_message.clone())
            .unwrap_or_default()
    }
}

/// Session whose interview is finished.
pub fn interviewed_session() -> SparkSession {
    let mut session = SparkSession::new("Bakery CRM", Level::Iskra, "en");
    session
        .chat_history
        .push(ChatMessage::ai("Who are your users?"));
    session.chat_history.push(ChatMessage::user("A) Bakers"));
    session.question_count = 1;
    session.interview_complete = true;
    session
}

pub fn team_reply() -> String {
    json!({
        "agents": [
            {
                "id": "backend",
                "name": "Backend Engineer",
                "emoji": "🛠",
                "type": "technical",
                "role": "API design",
                "description": "Builds the REST API",
                "agentMd": "# Backend Engineer\n\nOwns the API."
            },
            {
                "id": "designer",
                "name": "UX Designer",
                "type": "business",
                "role": "User flows",
                "description": "Designs the ordering flow"
            }
        ],
        "teamConfig": "# Team\n\nBackend and design pair up."
    })
    .to_string()
}

pub fn refined_reply() -> String {
    format!(
        "+QA Engineer joins, -UX Designer leaves.\n[UPDATED_TEAM]\n{}",
        json!({
            "agents": [
                {
                    "id": "backend",
                    "name": "Backend Engineer",
                    "emoji": "🛠",
                    "type": "technical",
                    "role": "API design",
                    "description": "Builds the REST API",
                    "agentMd": "# Backend Engineer\n\nOwns the API."
                },
                {
                    "id": "qa",
                    "name": "QA Engineer",
                    "type": "technical",
                    "role": "Testing",
                    "description": "Keeps the build green"
                }
            ]
        })
    )
}
