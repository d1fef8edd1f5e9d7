//! Closed-question interview about the user's app idea.

use crate::error::{AppError, Result};
use crate::prompts;
use crate::reply::{
    AnswerOption, INTERVIEW_COMPLETE_MARKER, legacy_question, parse_json_object,
    parse_legacy_options,
};
use crate::session::SparkSession;
use agentspark_core::project::ChatMessage;
use agentspark_interaction::InferenceOrchestrator;
use serde::Deserialize;
use std::sync::Arc;

/// A question the user should answer next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewQuestion {
    /// `Business`, `Frontend` or `Backend` when the model said so
    pub section: Option<String>,
    pub question: String,
    /// Empty when the model asked an open question
    pub options: Vec<AnswerOption>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterviewStep {
    Question(InterviewQuestion),
    Complete { summary: String },
}

impl InterviewStep {
    pub fn is_complete(&self) -> bool {
        matches!(self, InterviewStep::Complete { .. })
    }
}

/// JSON shape the interviewer is asked to answer with.
#[derive(Deserialize, Debug, Default)]
struct InterviewReply {
    #[serde(default)]
    complete: bool,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    section: Option<String>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    options: Vec<AnswerOption>,
}

pub struct InterviewDriver {
    orchestrator: Arc<InferenceOrchestrator>,
}

impl InterviewDriver {
    pub fn new(orchestrator: Arc<InferenceOrchestrator>) -> Self {
        Self { orchestrator }
    }

    /// Starts a fresh interview: clears the transcript and the call trace,
    /// then asks for the first question.
    pub async fn start(&self, session: &mut SparkSession) -> Result<InterviewStep> {
        session.chat_history.clear();
        session.question_count = 0;
        session.interview_complete = false;
        self.orchestrator.recorder().reset().await;

        let system = prompts::interview_system(session)?;
        let message = format!(
            "[START_INTERVIEW] Topic: {}. Ask the first question.",
            session.topic
        );
        tracing::info!("[InterviewDriver] Starting interview: {}", session.topic);
        let raw = self
            .orchestrator
            .run_inference_call(&system, &message, Some("Interview · Starting..."))
            .await?;

        match parse_json_object::<InterviewReply>(&raw) {
            Some(reply) if reply.complete => Ok(Self::finish(session, reply.summary)),
            Some(reply) if reply.question.is_some() => {
                session.chat_history.push(ChatMessage::ai(raw.clone()));
                Ok(InterviewStep::Question(InterviewQuestion {
                    section: reply.section,
                    question: reply.question.unwrap_or_default(),
                    options: reply.options,
                }))
            }
            _ => {
                session.chat_history.push(ChatMessage::ai(raw.clone()));
                Ok(InterviewStep::Question(Self::legacy(&raw)))
            }
        }
    }

    /// Records `answer` and asks for the next question, or finishes the
    /// interview once the model says so or the question budget is spent.
    ///
    /// If the call fails the answer is taken back, so it can be retried.
    pub async fn answer(&self, session: &mut SparkSession, answer: &str) -> Result<InterviewStep> {
        if session.interview_complete {
            return Err(AppError::invalid_state("The interview is already complete"));
        }
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(AppError::invalid_state("Answer must not be empty"));
        }

        session.chat_history.push(ChatMessage::user(answer));
        session.question_count += 1;
        let (count, max) = (session.question_count, session.max_questions);

        let system = prompts::interview_system(session)?;
        let message = format!(
            "{}\n\nThis was answer {} of {}. Ask next question or finalize.",
            session.transcript(),
            count,
            max
        );
        let label = format!("Interview · Q{count} of {max}");
        let raw = match self
            .orchestrator
            .run_inference_call(&system, &message, Some(&label))
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                session.chat_history.pop();
                session.question_count -= 1;
                return Err(e.into());
            }
        };

        match parse_json_object::<InterviewReply>(&raw) {
            Some(reply) if reply.complete => Ok(Self::finish(session, reply.summary)),
            // An open question comes with no options
            Some(reply) if reply.question.is_some() => {
                let question = reply.question.unwrap_or_default();
                session.chat_history.push(ChatMessage::ai(question.clone()));
                Ok(InterviewStep::Question(InterviewQuestion {
                    section: reply.section,
                    question,
                    options: reply.options,
                }))
            }
            _ => {
                session.chat_history.push(ChatMessage::ai(raw.clone()));
                if raw.contains(INTERVIEW_COMPLETE_MARKER) || count >= max {
                    session.interview_complete = true;
                    tracing::info!("[InterviewDriver] Interview complete after {} answers", count);
                    Ok(InterviewStep::Complete {
                        summary: legacy_question(&raw),
                    })
                } else {
                    Ok(InterviewStep::Question(Self::legacy(&raw)))
                }
            }
        }
    }

    fn finish(session: &mut SparkSession, summary: Option<String>) -> InterviewStep {
        let summary = summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Interview complete.".to_string());
        session.chat_history.push(ChatMessage::ai(summary.clone()));
        session.interview_complete = true;
        tracing::info!(
            "[InterviewDriver] Interview complete after {} answers",
            session.question_count
        );
        InterviewStep::Complete { summary }
    }

    fn legacy(raw: &str) -> InterviewQuestion {
        InterviewQuestion {
            section: None,
            question: legacy_question(raw),
            options: parse_legacy_options(raw),
        }
    }
}
