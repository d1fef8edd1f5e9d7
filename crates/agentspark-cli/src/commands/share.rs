use agentspark_infrastructure::share::share_url;
use anyhow::Result;
use colored::Colorize;

use crate::bootstrap::AppBootstrap;

pub async fn encode(
    app: &AppBootstrap,
    project_id: &str,
    password: Option<&str>,
    base: Option<&str>,
) -> Result<()> {
    let encoded = app.services.projects.share(project_id, password).await?;
    match base {
        Some(base) => println!("{}", share_url(base, &encoded)),
        None => println!("#share={encoded}"),
    }
    if password.is_some() {
        eprintln!("{}", "🔒 Recipients need the password to open this link".bright_black());
    }
    Ok(())
}

pub async fn decode(app: &AppBootstrap, link: &str, password: Option<&str>) -> Result<()> {
    let record = app.services.projects.import_share(link, password).await?;
    println!("✅ Imported '{}' as {}", record.name, record.id.bold());
    crate::render::team(&record.snapshot.agents);
    Ok(())
}
