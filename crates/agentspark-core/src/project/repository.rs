//! Project repository trait.
//!
//! Defines the interface for project persistence operations.

use super::model::{ProjectRecord, ProjectSnapshot};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for saved projects.
///
/// Decouples the drivers from the storage mechanism (JSON files, a
/// database, ...).
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores `snapshot` as a new project with a fresh id.
    async fn create(&self, snapshot: ProjectSnapshot) -> Result<ProjectRecord>;

    /// Writes an existing project, replacing any previous copy.
    async fn save(&self, record: &ProjectRecord) -> Result<()>;

    /// Finds a project by id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))`: Project found
    /// - `Ok(None)`: No project with this id
    async fn find_by_id(&self, id: &str) -> Result<Option<ProjectRecord>>;

    /// All projects, most recently updated first.
    async fn list(&self) -> Result<Vec<ProjectRecord>>;

    /// Deletes a project. Deleting a missing project is not an error.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Duplicates a project under a new id.
    ///
    /// Fails with `NotFound` when `id` does not exist.
    async fn fork(&self, id: &str) -> Result<ProjectRecord>;
}
