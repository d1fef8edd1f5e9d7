//! Atomic file operations for JSON and TOML documents.
//!
//! Writes go to a hidden temp file in the same directory, are synced, then
//! renamed over the target, so readers never see a half-written document.

use agentspark_core::{Result, SparkError};
use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// On-disk encoding of an [`AtomicFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Pretty-printed JSON
    Json,
    Toml,
}

/// A handle to one document stored atomically.
///
/// Provides:
/// - **Atomicity**: tmp file + rename
/// - **Durability**: explicit fsync before rename
/// - **Consistency**: the document is parsed on every load
#[derive(Debug, Clone)]
pub struct AtomicFile<T> {
    path: PathBuf,
    format: FileFormat,
    _phantom: PhantomData<T>,
}

impl<T> AtomicFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>, format: FileFormat) -> Self {
        Self {
            path: path.into(),
            format,
            _phantom: PhantomData,
        }
    }

    pub fn json(path: impl Into<PathBuf>) -> Self {
        Self::new(path, FileFormat::Json)
    }

    pub fn toml(path: impl Into<PathBuf>) -> Self {
        Self::new(path, FileFormat::Toml)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and parses the document.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and parsed
    /// - `Ok(None)`: File doesn't exist or is blank
    /// - `Err`: Failed to read or parse the file
    pub async fn load(&self) -> Result<Option<T>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data = match self.format {
            FileFormat::Json => serde_json::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)?,
        };
        Ok(Some(data))
    }

    /// Serializes `data` and replaces the file atomically.
    pub async fn save(&self, data: &T) -> Result<()> {
        let content = match self.format {
            FileFormat::Json => serde_json::to_string_pretty(data)?,
            FileFormat::Toml => toml::to_string_pretty(data)?,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let tmp_path = self.temp_path()?;
        let mut tmp_file = fs::File::create(&tmp_path).await?;
        tmp_file.write_all(content.as_bytes()).await?;
        tmp_file.sync_all().await?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    /// Removes the file. A missing file is not an error.
    pub async fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| SparkError::io("Path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| SparkError::io("Path has no file name"))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}
