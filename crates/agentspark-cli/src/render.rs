//! Terminal output.

use agentspark_application::{
    InterviewQuestion, PendingRefinement, ScoreReport, VersionComparison,
};
use agentspark_core::agent::Agent;
use agentspark_core::project::ProjectRecord;
use agentspark_core::trace::{CallSpan, SpanStatus, TraceStats};
use agentspark_core::version::Version;
use agentspark_interaction::CallNotice;
use chrono::Local;
use colored::Colorize;

pub fn notice(notice: &CallNotice) {
    match notice {
        CallNotice::TryingNext { failed, next } => {
            eprintln!("{}", format!("↻ {failed} failed, trying {next}").yellow());
        }
        CallNotice::FellBack {
            model_label,
            model_id,
        } => {
            eprintln!(
                "{}",
                format!("↻ Answered by fallback model {model_label} ({model_id})").yellow()
            );
        }
    }
}

fn status_cell(status: SpanStatus) -> String {
    let text = format!("{:<9}", format!("{status:?}").to_lowercase());
    match status {
        SpanStatus::Ok => text.green().to_string(),
        SpanStatus::Fallback => text.yellow().to_string(),
        SpanStatus::Error => text.red().to_string(),
        SpanStatus::Cancelled => text.bright_black().to_string(),
        SpanStatus::Pending => text.blue().to_string(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{kept}…")
    } else {
        text.to_string()
    }
}

pub fn trace_table(spans: &[CallSpan]) {
    if spans.is_empty() {
        return;
    }
    eprintln!();
    eprintln!(
        "{}",
        format!(
            "{:>3}  {:<34} {:<24} {:<9} {:>7} {:>7}",
            "#", "Label", "Model", "Status", "ms", "Tokens"
        )
        .bold()
    );
    for span in spans {
        let duration = span
            .duration_ms
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into());
        let tokens = span.tokens.map(|t| t.to_string()).unwrap_or_else(|| "-".into());
        eprintln!(
            "{:>3}  {:<34} {:<24} {} {:>7} {:>7}",
            span.id,
            truncate(&span.label, 34),
            truncate(&span.model_label, 24),
            status_cell(span.status),
            duration,
            tokens
        );
        if let Some(error) = &span.error {
            eprintln!("     {}", truncate(error, 100).red());
        }
    }

    let stats = TraceStats::from_spans(spans, None);
    let summary = format!(
        "{} calls · {} ms total · {} ms avg · {} tokens · {} fallbacks · {} errors",
        stats.calls,
        stats.total_duration_ms,
        stats.average_duration_ms,
        stats.total_tokens,
        stats.fallback_count,
        stats.error_count
    );
    eprintln!("{}", summary.bright_black());
}

pub fn question(number: u32, max: u32, question: &InterviewQuestion) {
    println!();
    let section = question
        .section
        .as_deref()
        .map(|s| format!(" · {s}"))
        .unwrap_or_default();
    println!("{}", format!("Q{number} of {max}{section}").bright_magenta().bold());
    for line in question.question.lines() {
        println!("{}", line.bright_blue());
    }
    for option in &question.options {
        println!("  {} {}", format!("{})", option.label).bold(), option.text);
        if let Some(impact) = &option.impact {
            println!("     {}", impact.bright_black());
        }
    }
}

pub fn team(agents: &[Agent]) {
    for agent in agents {
        let kind = if agent.is_technical() { "technical" } else { "business" };
        println!(
            "  {} {} {} {}",
            agent.emoji,
            agent.display_name().bold(),
            format!("[{kind}]").bright_black(),
            agent.role
        );
    }
}

pub fn score(report: &ScoreReport) {
    let overall = report
        .overall_score
        .map(|s| format!("{s:.0}"))
        .unwrap_or_else(|| "?".into());
    let label = report.overall_label.as_deref().unwrap_or("");
    println!("{}", format!("Complexity: {overall} {label}").bold());
    for metric in &report.metrics {
        println!("  {:<24} {:>5.0}", metric.label, metric.value);
    }
    for risk in report.risk_texts() {
        println!("  {} {}", "!".yellow(), risk);
    }
    if let Some(level) = &report.suggested_level {
        println!("  Suggested level: {level}");
    }
}

pub fn preview(pending: &PendingRefinement, current: &[Agent]) {
    println!("{}", pending.summary.bright_blue());
    let name_in = |agents: &[Agent], id: &str| {
        agents
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.display_name().to_string())
            .unwrap_or_else(|| id.to_string())
    };
    let diff = &pending.preview.diff;
    for id in &diff.added {
        println!("  {}", format!("+{}", name_in(&pending.agents, id.as_str())).green());
    }
    for id in &diff.removed {
        let name = pending
            .preview
            .removed_agent_names
            .get(id)
            .cloned()
            .unwrap_or_else(|| name_in(current, id.as_str()));
        println!("  {}", format!("-{name}").red());
    }
    for id in &diff.changed {
        println!("  {}", format!("~{}", name_in(&pending.agents, id.as_str())).yellow());
    }
    if diff.is_empty() {
        println!("  {}", "No agent changes".bright_black());
    }
}

pub fn history(versions: &[Version]) {
    for version in versions {
        let when = version.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        let changes = if version.is_origin || version.diff.is_empty() {
            String::new()
        } else {
            let names = |ids: &[String], sign: &str| {
                ids.iter()
                    .map(|id| format!("{sign}{}", version.name_of(id)))
                    .collect::<Vec<_>>()
            };
            let mut parts = names(&version.diff.added[..], "+");
            parts.extend(names(&version.diff.removed[..], "-"));
            parts.extend(names(&version.diff.changed[..], "~"));
            format!("  {}", parts.join(" ").bright_black())
        };
        println!(
            "  {:>4}  {}  {}{}",
            version.marker(),
            when,
            version.label,
            changes
        );
    }
}

pub fn project_line(record: &ProjectRecord) {
    let updated = record.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
    println!(
        "{}  {}  {}  {}",
        record.id.bright_black(),
        updated,
        record.name.bold(),
        format!(
            "{} agents · {} versions",
            record.snapshot.agents.len(),
            record.snapshot.version_history.len()
        )
        .bright_black()
    );
}

pub fn comparison(comparison: &VersionComparison) {
    let VersionComparison { from, to, changes } = comparison;
    println!(
        "{} {} {}",
        format!("{} {}", from.marker(), from.label).bold(),
        "→".bright_black(),
        format!("{} {}", to.marker(), to.label).bold()
    );
    for id in &changes.diff.added {
        println!("  {}", format!("+{}", to.name_of(id)).green());
    }
    for id in &changes.diff.removed {
        let name = changes
            .removed_agent_names
            .get(id)
            .map(String::as_str)
            .unwrap_or_else(|| from.name_of(id));
        println!("  {}", format!("-{name}").red());
    }
    for id in &changes.diff.changed {
        println!("  {}", format!("~{}", to.name_of(id)).yellow());
    }
    if changes.diff.is_empty() {
        println!("  {}", "No agent changes".bright_black());
    }
}
