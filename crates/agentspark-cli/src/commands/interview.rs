use std::str::FromStr;

use agentspark_application::{InterviewQuestion, InterviewStep, SparkSession};
use agentspark_core::level::Level;
use anyhow::{Result, anyhow};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::bootstrap::AppBootstrap;
use crate::render;

pub struct InterviewOptions {
    pub topic: String,
    pub level: Option<String>,
    pub lang: Option<String>,
    pub agents: Option<String>,
    pub questions: Option<u32>,
}

impl InterviewOptions {
    fn into_session(self, app: &AppBootstrap) -> Result<SparkSession> {
        let mut session = SparkSession::from_config(self.topic, &app.config.interview);
        if let Some(level) = self.level {
            let level = Level::from_str(&level).map_err(|_| {
                anyhow!("Unknown level '{level}', expected iskra, plomien, pozar or inferno")
            })?;
            session.level = level;
            session.agent_count = level.agent_count().to_string();
        }
        if let Some(lang) = self.lang {
            session.lang = lang;
        }
        if let Some(questions) = self.questions {
            session = session.with_max_questions(questions);
        }
        if let Some(agents) = self.agents {
            session = session.with_agent_count(agents);
        }
        Ok(session)
    }
}

/// Reads one answer. A bare option letter expands to the option's text.
/// `None` means the user gave up.
fn read_answer(editor: &mut DefaultEditor, question: &InterviewQuestion) -> Result<Option<String>> {
    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
                    return Ok(None);
                }
                let _ = editor.add_history_entry(line);
                let picked = question
                    .options
                    .iter()
                    .find(|option| option.label.eq_ignore_ascii_case(line));
                return Ok(Some(match picked {
                    Some(option) => option.as_answer(),
                    None => line.to_string(),
                }));
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(None),
            Err(e) => return Err(e.into()),
        }
    }
}

pub async fn run(app: &AppBootstrap, options: InterviewOptions) -> Result<()> {
    let services = &app.services;
    let mut session = options.into_session(app)?;
    let mut editor = DefaultEditor::new()?;

    println!(
        "{}",
        format!(
            "✨ {} · {} · {} questions",
            session.topic,
            session.level.display_name(),
            session.max_questions
        )
        .bold()
    );
    println!("{}", "Pick a letter or type your own answer. 'quit' stops.".bright_black());

    let mut step = services
        .interview
        .start(&mut session)
        .await
        .map_err(|e| app.explain(e))?;

    loop {
        let question = match &step {
            InterviewStep::Complete { summary } => {
                println!();
                println!("{}", summary.bright_blue());
                break;
            }
            InterviewStep::Question(question) => question.clone(),
        };
        render::question(session.question_count + 1, session.max_questions, &question);

        let Some(answer) = read_answer(&mut editor, &question)? else {
            println!("Interview stopped, nothing saved.");
            render::trace_table(&services.orchestrator.recorder().spans().await);
            return Ok(());
        };
        match services.interview.answer(&mut session, &answer).await {
            Ok(next) => step = next,
            Err(e) => eprintln!("{}", app.explain(e).to_string().red()),
        }
    }

    println!();
    println!("⚙  Generating team...");
    let generated = services.generation.generate(&mut session).await;
    if let Err(e) = generated {
        render::trace_table(&services.orchestrator.recorder().spans().await);
        return Err(app.explain(e));
    }
    render::team(session.agents());

    if let Some(report) = services.scoring.score(&session).await {
        println!();
        render::score(&report);
    }

    let model = app.selected_model().await;
    let record = services
        .projects
        .save_session(&mut session, Some(&model))
        .await?;
    println!();
    println!("✅ Saved as {}", record.id.bold());

    render::trace_table(&services.orchestrator.recorder().spans().await);
    Ok(())
}
