//! Writes resolved shoes as numbered JSON files.

use crate::flightclub::ResolvedItem;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes `<n>.json` files into one output directory.
pub struct FileEmitter {
    dir: PathBuf,
}

impl FileEmitter {
    /// Creates an emitter for `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file for a sequence number.
    pub fn path_for(&self, number: u32) -> PathBuf {
        self.dir.join(format!("{}.json", number))
    }

    /// Writes `{"name": ..., "img": ...}` to `<number>.json`.
    ///
    /// An existing file with the same number is overwritten. The directory
    /// is created if it does not exist yet.
    pub async fn emit(&self, number: u32, item: &ResolvedItem) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create output directory: {}", self.dir.display()))?;

        let path = self.path_for(number);
        let json = serde_json::to_string(item).context("Failed to serialize shoe record")?;

        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write shoe file: {}", path.display()))?;

        info!("Created file {}.json", number);
        Ok(path)
    }
}
