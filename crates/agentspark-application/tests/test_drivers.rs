mod common;

use agentspark_application::{
    AppError, InterviewQuestion, InterviewStep, RefineAction, RefinementDriver, SparkSession,
};
use agentspark_core::level::Level;
use agentspark_core::project::ChatRole;
use agentspark_core::{Completion, ProviderError};
use agentspark_interaction::ScriptStep;
use common::{Harness, interviewed_session, refined_reply, team_reply};
use serde_json::json;

fn question(text: &str) -> String {
    json!({
        "section": "Business",
        "question": text,
        "options": [
            { "label": "A", "text": "Bakers", "impact": "Simple UI" },
            { "label": "B", "text": "Bakery chains", "impact": "Multi-tenant data" }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn test_interview_json_flow() {
    let h = Harness::replies(vec![
        question("Who are your users?"),
        format!("Great.\n```json\n{}\n```", question("How do they pay?")),
        json!({ "complete": true, "summary": "A CRM for small bakeries." }).to_string(),
    ])
    .await;
    let mut session = SparkSession::new("Bakery CRM", Level::Iskra, "en").with_max_questions(2);

    let step = h.services.interview.start(&mut session).await.unwrap();
    let InterviewStep::Question(first) = step else {
        panic!("expected a question, got {step:?}");
    };
    assert_eq!(first.section.as_deref(), Some("Business"));
    assert_eq!(first.options.len(), 2);
    assert_eq!(
        h.adapter.calls()[0].request.user_message,
        "[START_INTERVIEW] Topic: Bakery CRM. Ask the first question."
    );

    let answer = first.options[0].as_answer();
    let step = h.services.interview.answer(&mut session, &answer).await.unwrap();
    let InterviewStep::Question(second) = step else {
        panic!("expected a question, got {step:?}");
    };
    assert_eq!(second.question, "How do they pay?");
    assert!(
        h.last_user_message()
            .ends_with("User: A) Bakers\n\nThis was answer 1 of 2. Ask next question or finalize.")
    );

    let step = h
        .services
        .interview
        .answer(&mut session, "B) Card at the counter")
        .await
        .unwrap();
    assert_eq!(
        step,
        InterviewStep::Complete {
            summary: "A CRM for small bakeries.".into()
        }
    );
    assert!(session.interview_complete);
    assert_eq!(session.question_count, 2);

    let roles: Vec<ChatRole> = session.chat_history.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![ChatRole::Ai, ChatRole::User, ChatRole::Ai, ChatRole::User, ChatRole::Ai]
    );
    assert_eq!(session.chat_history[2].text, "How do they pay?");

    assert_eq!(
        h.span_labels().await,
        vec![
            "Interview · Starting...",
            "Interview · Q1 of 2",
            "Interview · Q2 of 2"
        ]
    );
}

#[tokio::test]
async fn test_interview_plain_text_replies() {
    let h = Harness::replies(vec![
        "Who will use it?\nA) Bakers | IMPACT: Simple UI\nB) Chains | IMPACT: Multi-tenant".to_string(),
        "Thanks, that is all I need.".to_string(),
    ])
    .await;
    let mut session = SparkSession::new("Bakery CRM", Level::Iskra, "en").with_max_questions(1);

    let InterviewStep::Question(first) = h.services.interview.start(&mut session).await.unwrap()
    else {
        panic!("expected a question");
    };
    assert_eq!(first.question, "Who will use it?");
    assert_eq!(first.options[1].impact.as_deref(), Some("Multi-tenant"));

    // The question budget is spent after one answer
    let step = h.services.interview.answer(&mut session, "A) Bakers").await.unwrap();
    assert!(step.is_complete());

    let err = h
        .services
        .interview
        .answer(&mut session, "A) Again")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
    assert_eq!(h.adapter.call_count(), 2);
}

#[tokio::test]
async fn test_interview_complete_marker() {
    let h = Harness::replies(vec![
        question("Who are your users?"),
        "Summary: bakeries. [INTERVIEW_COMPLETE]".to_string(),
    ])
    .await;
    let mut session = SparkSession::new("Bakery CRM", Level::Iskra, "en");
    h.services.interview.start(&mut session).await.unwrap();

    let step = h.services.interview.answer(&mut session, "A) Bakers").await.unwrap();
    assert_eq!(
        step,
        InterviewStep::Complete {
            summary: "Summary: bakeries.".into()
        }
    );
}

#[tokio::test]
async fn test_failed_answer_can_be_retried() {
    let h = Harness::new(vec![
        ScriptStep::Reply(Completion::new(question("Who are your users?"), None)),
        ScriptStep::Fail(ProviderError::http(400, "invalid request")),
    ])
    .await;
    let mut session = SparkSession::new("Bakery CRM", Level::Iskra, "en");
    h.services.interview.start(&mut session).await.unwrap();

    let err = h
        .services
        .interview
        .answer(&mut session, "A) Bakers")
        .await
        .unwrap_err();
    let AppError::Inference(inference) = err else {
        panic!("expected an inference error");
    };
    assert_eq!(inference.status(), Some(400));
    assert_eq!(session.chat_history.len(), 1);
    assert_eq!(session.question_count, 0);
}

#[tokio::test]
async fn test_start_resets_trace() {
    let h = Harness::replies(vec![question("First?"), question("Again?")]).await;
    let mut session = SparkSession::new("Bakery CRM", Level::Iskra, "en");
    h.services.interview.start(&mut session).await.unwrap();
    h.services.interview.start(&mut session).await.unwrap();

    assert_eq!(h.span_labels().await, vec!["Interview · Starting..."]);
    assert_eq!(session.chat_history.len(), 1);
}

#[tokio::test]
async fn test_generate_commits_origin() {
    let h = Harness::replies(vec![format!("Here you go:\n{}", team_reply())]).await;
    let mut session = interviewed_session();

    let version = h.services.generation.generate(&mut session).await.unwrap();
    assert!(version.is_origin);
    assert_eq!(version.version_number, 1);
    assert_eq!(version.label, "Original team — Bakery CRM");
    assert_eq!(version.agents.len(), 2);

    let files = session.files();
    assert_eq!(files["agent-backend.md"], "# Backend Engineer\n\nOwns the API.");
    assert_eq!(
        files["agent-designer.md"],
        "# Agent: UX Designer\n\n**Role:** User flows\n\nDesigns the ordering flow"
    );
    assert_eq!(files["team-config.md"], "# Team\n\nBackend and design pair up.");
    assert!(files["README.md"].contains("- **UX Designer** [BUSINESS] (User flows)"));
    assert_eq!(files.len(), 6);

    let call = &h.adapter.calls()[0];
    assert!(call.request.user_message.starts_with("Here is the complete interview:\nAgentSpark: Who are your users?\nUser: A) Bakers"));
    assert_eq!(h.span_labels().await, vec!["Generate Team · 2-3 agents · iskra"]);
}

#[tokio::test]
async fn test_generate_rejects_unparseable_reply() {
    let h = Harness::replies(vec!["I cannot do that.".to_string()]).await;
    let mut session = interviewed_session();

    let err = h.services.generation.generate(&mut session).await.unwrap_err();
    assert!(err.is_parse());
    assert!(session.versions.is_empty());
}

#[tokio::test]
async fn test_refine_apply_and_revert() {
    let h = Harness::replies(vec![team_reply(), refined_reply()]).await;
    let mut session = interviewed_session();
    h.services.generation.generate(&mut session).await.unwrap();
    let origin_files = session.files().clone();

    let pending = h
        .services
        .refinement
        .propose(&session, "Swap the designer for QA", Some(RefineAction::Remove))
        .await
        .unwrap();
    assert_eq!(pending.summary, "+QA Engineer joins, -UX Designer leaves.");
    assert_eq!(pending.full_request, "[Action: remove] Swap the designer for QA");
    assert_eq!(pending.preview.diff.added, vec!["qa"]);
    assert_eq!(pending.preview.diff.removed, vec!["designer"]);
    assert!(pending.preview.diff.changed.is_empty());
    assert_eq!(h.last_user_message(), "Request: [Action: remove] Swap the designer for QA");
    // Nothing changes until the proposal is applied
    assert_eq!(session.versions.len(), 1);

    let version = RefinementDriver::apply(&mut session, pending).unwrap();
    assert_eq!(version.version_number, 2);
    assert_eq!(version.label, "Swap the designer for QA");
    assert_eq!(version.removed_agent_names["designer"], "UX Designer");

    let files = session.files();
    assert!(files.contains_key("agent-qa.md"));
    assert!(files.contains_key("skill-qa.md"));
    assert!(!files.contains_key("agent-designer.md"));
    assert!(!files.contains_key("skill-designer.md"));
    // No teamConfig in the reply, so the old one stays
    assert_eq!(files["team-config.md"], origin_files["team-config.md"]);
    assert!(files["README.md"].contains("QA Engineer"));
    assert_eq!(session.refine_history.len(), 2);
    assert_eq!(session.refine_history[1].text, "+QA Engineer joins, -UX Designer leaves.");

    RefinementDriver::revert_last(&mut session).unwrap();
    assert_eq!(session.files(), &origin_files);
    assert!(session.refine_history.is_empty());
    assert_eq!(session.versions.len(), 2);
    assert!(RefinementDriver::revert_last(&mut session).is_err());

    assert_eq!(
        h.span_labels().await,
        vec!["Generate Team · 2-3 agents · iskra", "Refine · v2"]
    );
}

#[tokio::test]
async fn test_refine_prompt_carries_previous_context() {
    let h = Harness::replies(vec![team_reply(), refined_reply(), refined_reply()]).await;
    let mut session = interviewed_session();
    h.services.generation.generate(&mut session).await.unwrap();

    let pending = h
        .services
        .refinement
        .propose(&session, "Add QA", None)
        .await
        .unwrap();
    RefinementDriver::apply(&mut session, pending).unwrap();

    h.services
        .refinement
        .propose(&session, "Make QA stricter", None)
        .await
        .unwrap();
    assert_eq!(
        h.last_user_message(),
        "Previous context:\nUser: Add QA\nAI: +QA Engineer joins, -UX Designer leaves.\n\nNew request: Make QA stricter"
    );
    assert_eq!(h.span_labels().await.last().unwrap(), "Refine · v3");
}

#[tokio::test]
async fn test_refine_unparseable_reply() {
    let h = Harness::replies(vec![team_reply(), "Sorry, no JSON today.".to_string()]).await;
    let mut session = interviewed_session();
    h.services.generation.generate(&mut session).await.unwrap();

    let err = h
        .services
        .refinement
        .propose(&session, "Add QA", None)
        .await
        .unwrap_err();
    assert!(err.is_parse());
    assert!(err.to_string().contains("Could not parse updated team."));
    assert_eq!(session.versions.len(), 1);
}

#[tokio::test]
async fn test_refine_requires_team() {
    let h = Harness::replies(vec![]).await;
    let session = interviewed_session();
    let err = h
        .services
        .refinement
        .propose(&session, "Add QA", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
    assert_eq!(h.adapter.call_count(), 0);
}

#[tokio::test]
async fn test_scoring_is_best_effort() {
    let h = Harness::new(vec![
        ScriptStep::Reply(Completion::new(
            json!({ "overallScore": 64, "overallLabel": "Moderate", "risks": ["Payments"] }).to_string(),
            None,
        )),
        ScriptStep::Fail(ProviderError::http(401, "bad key")),
    ])
    .await;
    let session = interviewed_session();

    let report = h.services.scoring.score(&session).await.unwrap();
    assert_eq!(report.overall_score, Some(64.0));
    assert_eq!(report.risk_texts(), vec!["Payments"]);

    assert!(h.services.scoring.score(&session).await.is_none());
    assert_eq!(
        h.span_labels().await,
        vec!["Scoring · Complexity analysis", "Scoring · Complexity analysis"]
    );
}

#[tokio::test]
async fn test_interview_complete_on_first_reply() {
    let h = Harness::replies(vec![
        json!({ "complete": true, "summary": "Nothing left to ask." }).to_string(),
    ])
    .await;
    let mut session = SparkSession::new("Bakery CRM", Level::Iskra, "en");

    let step = h.services.interview.start(&mut session).await.unwrap();
    assert_eq!(
        step,
        InterviewStep::Complete {
            summary: "Nothing left to ask.".into()
        }
    );
    assert_eq!(session.chat_history.len(), 1);
    assert_eq!(session.chat_history[0].role, ChatRole::Ai);
    assert_eq!(session.chat_history[0].text, "Nothing left to ask.");
}

#[tokio::test]
async fn test_interview_open_json_question() {
    let h = Harness::replies(vec![
        question("Who are your users?"),
        json!({ "section": "Backend", "question": "Which database do you use today?", "options": [] })
            .to_string(),
    ])
    .await;
    let mut session = SparkSession::new("Bakery CRM", Level::Iskra, "en");
    h.services.interview.start(&mut session).await.unwrap();

    let step = h.services.interview.answer(&mut session, "A) Bakers").await.unwrap();
    assert_eq!(
        step,
        InterviewStep::Question(InterviewQuestion {
            section: Some("Backend".into()),
            question: "Which database do you use today?".into(),
            options: vec![],
        })
    );
    assert_eq!(
        session.chat_history.last().map(|m| m.text.as_str()),
        Some("Which database do you use today?")
    );
    assert!(!session.interview_complete);
}
