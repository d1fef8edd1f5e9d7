use std::str::FromStr;

use agentspark_application::{RefineAction, RefinementDriver};
use anyhow::{Result, anyhow};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use strum::IntoEnumIterator;

use crate::bootstrap::AppBootstrap;
use crate::render;

fn parse_action(action: Option<&str>) -> Result<Option<RefineAction>> {
    action
        .map(|name| {
            RefineAction::from_str(name).map_err(|_| {
                let known: Vec<String> = RefineAction::iter().map(|a| a.to_string()).collect();
                anyhow!("Unknown action '{name}', expected one of: {}", known.join(", "))
            })
        })
        .transpose()
}

fn confirm(prompt: &str) -> Result<bool> {
    let mut editor = DefaultEditor::new()?;
    match editor.readline(prompt) {
        Ok(line) => Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes")),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

pub async fn run(
    app: &AppBootstrap,
    project_id: &str,
    request: &str,
    action: Option<&str>,
    yes: bool,
) -> Result<()> {
    let services = &app.services;
    let action = parse_action(action)?;
    let mut session = services.projects.open(project_id).await?;

    let proposed = services.refinement.propose(&session, request, action).await;
    render::trace_table(&services.orchestrator.recorder().spans().await);
    let pending = proposed.map_err(|e| app.explain(e))?;

    println!();
    render::preview(&pending, session.agents());
    if !yes && !confirm("Apply these changes? [y/N] ")? {
        println!("Discarded.");
        return Ok(());
    }

    let version = RefinementDriver::apply(&mut session, pending)?;
    let model = app.selected_model().await;
    services.projects.save_session(&mut session, Some(&model)).await?;
    println!(
        "✅ Saved {} · {}",
        format!("v{}", version.version_number).bold(),
        version.label
    );
    Ok(())
}
