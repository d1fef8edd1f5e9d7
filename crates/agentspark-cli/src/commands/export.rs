use std::path::Path;

use anyhow::Result;

use crate::bootstrap::AppBootstrap;

pub async fn run(app: &AppBootstrap, project_id: &str, dir: &Path) -> Result<()> {
    let summary = app.services.projects.export(project_id, dir).await?;
    println!("📦 Exported {} files to {}", summary.written.len(), summary.dir.display());
    for name in &summary.written {
        println!("  - {name}");
    }
    Ok(())
}
