//! File-backed implementation of the [`ConfigStore`] trait.
//!
//! One upsert is: read the whole file, parse, mutate the line buffer, rewrite.
//! The file must already exist — this tool repairs boot configs, it does not
//! create them — so a missing file surfaces as [`StoreError::NotFound`]
//! rather than being silently created.
//!
//! No locking: the operation runs once per process invocation against a local
//! file, and concurrent external writers are an accepted limitation (the
//! original sequential flow had the same behaviour).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use picam_core::{BootConfigDocument, ConfigEntry, UpsertOutcome};
use tracing::debug;

use crate::application::set_config::{ConfigStore, StoreError};

/// Upserts `key=value` lines into one boot-configuration file.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the current file contents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] / [`StoreError::PermissionDenied`] /
    /// [`StoreError::Io`] for the corresponding read failures.
    pub fn read_document(&self) -> Result<BootConfigDocument, StoreError> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|source| self.map_io_error(source))?;
        Ok(BootConfigDocument::parse(&text))
    }

    fn map_io_error(&self, source: std::io::Error) -> StoreError {
        match source.kind() {
            ErrorKind::NotFound => StoreError::NotFound {
                path: self.path.clone(),
            },
            ErrorKind::PermissionDenied => StoreError::PermissionDenied {
                path: self.path.clone(),
            },
            _ => StoreError::Io {
                path: self.path.clone(),
                source,
            },
        }
    }
}

impl ConfigStore for FileConfigStore {
    fn upsert(&mut self, entry: &ConfigEntry) -> Result<UpsertOutcome, StoreError> {
        let mut doc = self.read_document()?;
        let outcome = doc.upsert(entry);
        std::fs::write(&self.path, doc.render()).map_err(|source| self.map_io_error(source))?;
        debug!(path = %self.path.display(), key = entry.key(), ?outcome, "config file rewritten");
        Ok(outcome)
    }
}
