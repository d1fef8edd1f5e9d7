use anyhow::Result;
use colored::Colorize;

use crate::bootstrap::AppBootstrap;
use crate::render;

pub async fn list(app: &AppBootstrap) -> Result<()> {
    let projects = app.services.projects.list().await?;
    if projects.is_empty() {
        println!(
            "No projects in {}",
            app.paths.projects_dir().display().to_string().bright_black()
        );
        return Ok(());
    }
    for record in &projects {
        render::project_line(record);
    }
    Ok(())
}

pub async fn show(app: &AppBootstrap, id: &str) -> Result<()> {
    let record = app.services.projects.get(id).await?;
    let snapshot = &record.snapshot;
    println!("{}", record.name.bold());
    println!(
        "  {} · {} · {}",
        snapshot.level.display_name(),
        snapshot.lang,
        snapshot.model_id.as_deref().unwrap_or("default model")
    );
    println!();
    println!("{}", "Team".bold());
    render::team(&snapshot.agents);
    println!();
    println!("{}", "Versions".bold());
    render::history(&snapshot.version_history);
    println!();
    println!("{}", "Files".bold());
    for name in snapshot.files.keys() {
        println!("  {name}");
    }
    Ok(())
}

pub async fn delete(app: &AppBootstrap, id: &str) -> Result<()> {
    app.services.projects.delete(id).await?;
    println!("🗑  Deleted {id}");
    Ok(())
}

pub async fn fork(app: &AppBootstrap, id: &str) -> Result<()> {
    let forked = app.services.projects.fork(id).await?;
    println!("Forked {} into {}", id, forked.id.bold());
    Ok(())
}

pub async fn restore(app: &AppBootstrap, id: &str, version: usize) -> Result<()> {
    let record = app.services.projects.restore_version(id, version).await?;
    println!("↩ Restored v{version} of {}", record.name);
    render::history(&record.snapshot.version_history);
    Ok(())
}

pub async fn diff(app: &AppBootstrap, id: &str, from: usize, to: usize) -> Result<()> {
    let comparison = app.services.projects.compare_versions(id, from, to).await?;
    render::comparison(&comparison);
    Ok(())
}
