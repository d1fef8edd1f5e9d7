//! Project use case.
//!
//! Coordinates a [`SparkSession`] with the [`ProjectRepository`]: saving and
//! resuming sessions, restoring versions, and moving teams in and out of
//! the workspace through share links and directory exports.

use crate::error::{AppError, Result};
use crate::session::SparkSession;
use agentspark_core::SparkError;
use agentspark_core::catalog::ModelConfig;
use agentspark_core::project::{ProjectRecord, ProjectRepository, ProjectSnapshot};
use agentspark_core::version::{AgentDiff, Version, VersionStore};
use agentspark_infrastructure::share::{self, SharePayload};
use agentspark_infrastructure::{ExportSummary, export_team};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;

/// Two versions of a project and the agent changes between them.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionComparison {
    pub from: Version,
    pub to: Version,
    pub changes: AgentDiff,
}

pub struct ProjectUseCase {
    /// Repository for project persistence
    repository: Arc<dyn ProjectRepository>,
}

impl ProjectUseCase {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self { repository }
    }

    /// Saves the session, creating a project on first save.
    ///
    /// Sessions without a team are not saved.
    pub async fn save_session(
        &self,
        session: &mut SparkSession,
        model: Option<&ModelConfig>,
    ) -> Result<ProjectRecord> {
        if !session.has_team() {
            return Err(AppError::invalid_state("Generate a team before saving"));
        }
        let snapshot = session.to_snapshot(model);

        if let Some(id) = session.project_id.as_deref() {
            if let Some(mut record) = self.repository.find_by_id(id).await? {
                record.update(snapshot, Utc::now());
                self.repository.save(&record).await?;
                tracing::info!("[ProjectUseCase] Updated project {}", record.id);
                return Ok(record);
            }
            tracing::warn!(
                "[ProjectUseCase] Project {} is gone, saving as a new project",
                id
            );
        }

        let record = self.repository.create(snapshot).await?;
        session.project_id = Some(record.id.clone());
        Ok(record)
    }

    pub async fn get(&self, id: &str) -> Result<ProjectRecord> {
        Ok(self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| SparkError::not_found("Project", id))?)
    }

    /// Resumes a saved project as a session.
    pub async fn open(&self, id: &str) -> Result<SparkSession> {
        Ok(SparkSession::from_record(&self.get(id).await?))
    }

    pub async fn list(&self) -> Result<Vec<ProjectRecord>> {
        Ok(self.repository.list().await?)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        Ok(self.repository.delete(id).await?)
    }

    pub async fn fork(&self, id: &str) -> Result<ProjectRecord> {
        Ok(self.repository.fork(id).await?)
    }

    /// Makes version `number` (1-based, as listed) the project's team.
    pub async fn restore_version(&self, id: &str, number: usize) -> Result<ProjectRecord> {
        let mut record = self.get(id).await?;
        let index = number
            .checked_sub(1)
            .ok_or_else(|| SparkError::history("Version numbers start at 1"))?;

        let mut store = record.snapshot.version_store();
        store.restore(index)?;
        let mut snapshot = record.snapshot.clone();
        snapshot.update_from_store(&store);
        record.update(snapshot, Utc::now());
        self.repository.save(&record).await?;
        tracing::info!("[ProjectUseCase] Restored v{} of {}", number, id);
        Ok(record)
    }

    /// Agent changes between two versions (1-based, as listed).
    pub async fn compare_versions(
        &self,
        id: &str,
        from: usize,
        to: usize,
    ) -> Result<VersionComparison> {
        let record = self.get(id).await?;
        let store = record.snapshot.version_store();
        let index = |number: usize| {
            number
                .checked_sub(1)
                .ok_or_else(|| SparkError::history("Version numbers start at 1"))
        };
        let (from, to) = (index(from)?, index(to)?);
        let changes = store.compare(from, to)?;
        let version = |i: usize| {
            store
                .get(i)
                .cloned()
                .ok_or_else(|| SparkError::history(format!("version index {i} out of range")))
        };
        Ok(VersionComparison {
            from: version(from)?,
            to: version(to)?,
            changes,
        })
    }

    /// Encodes the project's current team for a share link.
    pub async fn share(&self, id: &str, password: Option<&str>) -> Result<String> {
        let record = self.get(id).await?;
        if record.snapshot.agents.is_empty() {
            return Err(AppError::invalid_state("The project has no team to share"));
        }
        let payload = SharePayload::from_snapshot(&record.snapshot, Utc::now());
        Ok(share::encode(&payload, password)?)
    }

    /// Imports a shared team as a new project whose history starts with
    /// the shared team.
    pub async fn import_share(&self, input: &str, password: Option<&str>) -> Result<ProjectRecord> {
        let payload = share::decode(input, password)?;
        let topic = payload.display_topic().to_string();

        let mut store = VersionStore::new();
        store.commit_origin_at(
            &payload.agents,
            &payload.files,
            format!("Shared: {topic}"),
            payload.created_at().unwrap_or_else(Utc::now),
        );
        let mut snapshot = ProjectSnapshot {
            topic,
            level: payload.level,
            lang: payload.lang,
            ..Default::default()
        };
        snapshot.update_from_store(&store);

        let record = self.repository.create(snapshot).await?;
        tracing::info!(
            "[ProjectUseCase] Imported shared team as {} ({} agents)",
            record.id,
            record.snapshot.agents.len()
        );
        Ok(record)
    }

    /// Writes the project's files and manifest into `dir`.
    pub async fn export(&self, id: &str, dir: impl AsRef<Path>) -> Result<ExportSummary> {
        let record = self.get(id).await?;
        Ok(export_team(&record.snapshot, dir, Utc::now()).await?)
    }
}
