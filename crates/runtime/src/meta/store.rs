//! Meta-progression persistence contract.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use super::MetaProgress;
use crate::error::{Result, RunError};

/// Read/write contract for the persistent profile.
pub trait MetaStore: Send + Sync {
    /// Loads the profile; a store that was never written yields `None`.
    fn load(&self) -> Result<Option<MetaProgress>>;

    fn save(&self, progress: &MetaProgress) -> Result<()>;
}

/// In-memory store for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStore {
    progress: RwLock<Option<MetaProgress>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(progress: MetaProgress) -> Self {
        Self {
            progress: RwLock::new(Some(progress)),
        }
    }
}

impl MetaStore for MemoryStore {
    fn load(&self) -> Result<Option<MetaProgress>> {
        let progress = self.progress.read().map_err(|_| RunError::LockPoisoned)?;
        Ok(progress.clone())
    }

    fn save(&self, progress: &MetaProgress) -> Result<()> {
        let mut slot = self.progress.write().map_err(|_| RunError::LockPoisoned)?;
        *slot = Some(progress.clone());
        Ok(())
    }
}

/// JSON file store.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-save never leaves a truncated profile behind.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MetaStore for JsonFileStore {
    fn load(&self) -> Result<Option<MetaProgress>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path)?;
        let progress = serde_json::from_slice(&bytes)
            .map_err(|e| RunError::StoreFormat(format!("{}: {}", self.path.display(), e)))?;
        debug!(target: "delve::meta", path = %self.path.display(), "profile loaded");
        Ok(Some(progress))
    }

    fn save(&self, progress: &MetaProgress) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(progress)
            .map_err(|e| RunError::StoreFormat(e.to_string()))?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;

        debug!(target: "delve::meta", path = %self.path.display(), "profile saved");
        Ok(())
    }
}
