//! JSON file based ProjectRepository implementation.
//!
//! Directory structure:
//! ```text
//! base_dir/
//! └── projects/
//!     ├── proj_1700000000000_k3j9x.json
//!     └── proj_1700000123456_0abcd.json
//! ```

use crate::storage::AtomicFile;
use agentspark_core::project::{ProjectRecord, ProjectRepository, ProjectSnapshot};
use agentspark_core::{Result, SparkError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::path::{Path, PathBuf};
use tokio::fs;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 5;

/// New project id: `proj_<millis>_<5 base36 chars>`.
pub fn new_project_id(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("proj_{}_{}", now.timestamp_millis(), suffix)
}

/// Ids are used as file names; anything else is treated as unknown.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Stores each project as one pretty-printed JSON file.
pub struct JsonProjectRepository {
    dir: PathBuf,
}

impl JsonProjectRepository {
    /// Creates a repository storing files directly in `dir`.
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn projects_dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, id: &str) -> AtomicFile<ProjectRecord> {
        AtomicFile::json(self.dir.join(format!("{id}.json")))
    }
}

#[async_trait]
impl ProjectRepository for JsonProjectRepository {
    async fn create(&self, snapshot: ProjectSnapshot) -> Result<ProjectRecord> {
        let now = Utc::now();
        let record = ProjectRecord::new(new_project_id(now), snapshot, now);
        self.save(&record).await?;
        tracing::info!("[JsonProjectRepository] Created project {}", record.id);
        Ok(record)
    }

    async fn save(&self, record: &ProjectRecord) -> Result<()> {
        if !is_valid_id(&record.id) {
            return Err(SparkError::config(format!(
                "Invalid project id '{}'",
                record.id
            )));
        }
        self.file_for(&record.id).save(record).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ProjectRecord>> {
        if !is_valid_id(id) {
            return Ok(None);
        }
        self.file_for(id).load().await
    }

    async fn list(&self) -> Result<Vec<ProjectRecord>> {
        let mut records = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_project = path.extension().is_some_and(|ext| ext == "json")
                && !entry.file_name().to_string_lossy().starts_with('.');
            if !is_project {
                continue;
            }

            match AtomicFile::<ProjectRecord>::json(&path).load().await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        "[JsonProjectRepository] Skipping unreadable project {}: {}",
                        path.display(),
                        e
                    );
                }
            }
        }

        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        if !is_valid_id(id) {
            return Ok(());
        }
        self.file_for(id).remove().await
    }

    async fn fork(&self, id: &str) -> Result<ProjectRecord> {
        let source = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| SparkError::not_found("Project", id))?;

        let now = Utc::now();
        let copy = source.fork(new_project_id(now), now);
        self.save(&copy).await?;
        tracing::info!("[JsonProjectRepository] Forked project {} into {}", id, copy.id);
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_id_shape() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let id = new_project_id(now);
        let parts: Vec<&str> = id.split('_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "proj");
        assert_eq!(parts[1], "1700000000000");
        assert_eq!(parts[2].len(), ID_SUFFIX_LEN);
        assert!(parts[2].bytes().all(|b| ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_id_validation_rejects_paths() {
        assert!(is_valid_id("proj_1_abcde"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("../secret"));
        assert!(!is_valid_id("a/b"));
    }
}
