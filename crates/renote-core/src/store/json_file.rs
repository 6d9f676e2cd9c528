//! File-backed draft store: one JSON document, replaced wholesale

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::DraftMap;
use crate::store::DraftStore;

/// Draft store persisting the collection as a single JSON file.
///
/// The file plays the role of the browser-profile storage slot: it survives
/// restarts, is scoped to the local user, and is replaced in full on every
/// write. A missing or malformed file reads as an empty collection.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<DraftMap> {
        if !self.path.exists() {
            return Ok(DraftMap::new());
        }

        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(DraftMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_map(&self, drafts: &DraftMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let raw = serde_json::to_string(drafts)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl DraftStore for JsonFileStore {
    fn load_all(&self) -> DraftMap {
        match self.read_map() {
            Ok(drafts) => drafts,
            Err(error) => {
                tracing::warn!(
                    "treating draft store at {} as empty: {error}",
                    self.path.display()
                );
                DraftMap::new()
            }
        }
    }

    fn save_all(&self, drafts: &DraftMap) -> bool {
        match self.write_map(drafts) {
            Ok(()) => true,
            Err(error) => {
                tracing::error!(
                    "failed to persist drafts to {}: {error}",
                    self.path.display()
                );
                false
            }
        }
    }

    fn clear(&self) -> bool {
        match fs::remove_file(&self.path) {
            Ok(()) => true,
            Err(error) if error.kind() == io::ErrorKind::NotFound => true,
            Err(error) => {
                tracing::error!(
                    "failed to clear draft store at {}: {error}",
                    self.path.display()
                );
                false
            }
        }
    }
}
