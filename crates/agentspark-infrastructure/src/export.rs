//! Writes a generated team to a directory.
//!
//! Every generated file is written as-is, plus an `agentspark.json`
//! manifest that holds the full team for lossless re-import.

use agentspark_core::agent::{Agent, FileMap};
use agentspark_core::level::Level;
use agentspark_core::project::ProjectSnapshot;
use agentspark_core::{Result, SparkError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

pub const MANIFEST_FILE: &str = "agentspark.json";
pub const MANIFEST_VERSION: u32 = 2;
const MANIFEST_SOURCE: &str = "agentspark";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportManifest {
    pub v: u32,
    pub source: String,
    pub topic: String,
    pub level: Level,
    pub lang: String,
    pub agents: Vec<Agent>,
    pub files: FileMap,
    /// Export time, epoch milliseconds
    pub ts: i64,
}

impl ExportManifest {
    pub fn from_snapshot(snapshot: &ProjectSnapshot, now: DateTime<Utc>) -> Self {
        Self {
            v: MANIFEST_VERSION,
            source: MANIFEST_SOURCE.to_string(),
            topic: snapshot.topic.clone(),
            level: snapshot.level,
            lang: snapshot.lang.clone(),
            agents: snapshot.agents.clone(),
            files: snapshot.files.clone(),
            ts: now.timestamp_millis(),
        }
    }
}

/// What [`export_team`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub dir: PathBuf,
    /// Generated files, in name order, followed by the manifest
    pub written: Vec<String>,
}

/// Generated file names come from model output; only plain relative names
/// are written.
fn safe_relative(name: &str) -> Result<&Path> {
    let path = Path::new(name);
    let plain = !name.is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if plain {
        Ok(path)
    } else {
        Err(SparkError::config(format!("Refusing to export file '{name}'")))
    }
}

/// Exports the snapshot's team into `dir`, creating it if needed.
pub async fn export_team(
    snapshot: &ProjectSnapshot,
    dir: impl AsRef<Path>,
    now: DateTime<Utc>,
) -> Result<ExportSummary> {
    let dir = dir.as_ref();
    if snapshot.agents.is_empty() {
        return Err(SparkError::config("Nothing to export: the team has no agents"));
    }
    fs::create_dir_all(dir).await?;

    let mut written = Vec::with_capacity(snapshot.files.len() + 1);
    for (name, content) in &snapshot.files {
        if name == MANIFEST_FILE {
            continue;
        }
        let target = dir.join(safe_relative(name)?);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, content).await?;
        written.push(name.clone());
    }

    let manifest = ExportManifest::from_snapshot(snapshot, now);
    fs::write(
        dir.join(MANIFEST_FILE),
        serde_json::to_string_pretty(&manifest)?,
    )
    .await?;
    written.push(MANIFEST_FILE.to_string());

    tracing::info!(
        "[Export] Wrote {} files to {}",
        written.len(),
        dir.display()
    );
    Ok(ExportSummary {
        dir: dir.to_path_buf(),
        written,
    })
}

/// Reads the manifest of an exported directory.
pub async fn read_manifest(dir: impl AsRef<Path>) -> Result<ExportManifest> {
    let path = dir.as_ref().join(MANIFEST_FILE);
    let content = fs::read_to_string(&path).await?;
    let manifest: ExportManifest = serde_json::from_str(&content)?;
    if manifest.source != MANIFEST_SOURCE {
        return Err(SparkError::config(format!(
            "{} was not written by AgentSpark",
            path.display()
        )));
    }
    Ok(manifest)
}
