//! SetConfigUseCase: enforce one `key=value` line in the boot configuration.
//!
//! This is the CLI's `set` command: validate the pair, hand it to a
//! [`ConfigStore`], and report which of the three upsert cases applied.
//! The store trait is defined here at the application seam; the file-backed
//! implementation lives in `infrastructure::storage`.

use std::path::PathBuf;

use picam_core::{ConfigEntry, EntryError, UpsertOutcome};
use thiserror::Error;

/// Error type for configuration-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The target file does not exist (and this tool does not create it).
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    /// The process lacks read or write access to the target file.
    #[error("permission denied accessing config file: {path}")]
    PermissionDenied { path: PathBuf },

    /// Any other file system I/O error.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A mutable store of `key=value` configuration lines.
///
/// The file-backed implementation is in the infrastructure layer; tests use
/// an in-memory implementation.
pub trait ConfigStore {
    /// Ensures the entry is present and active in the store.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the underlying storage cannot be read or
    /// written.
    fn upsert(&mut self, entry: &ConfigEntry) -> Result<UpsertOutcome, StoreError>;
}

/// Error type for the set-config use case.
#[derive(Debug, Error)]
pub enum SetConfigError {
    /// The key or value failed validation.
    #[error("invalid argument: {0}")]
    InvalidEntry(#[from] EntryError),

    /// The store could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a successful set-config invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetConfigReport {
    pub entry: ConfigEntry,
    pub outcome: UpsertOutcome,
}

impl SetConfigReport {
    /// The human-readable status line printed to stdout.
    pub fn status_line(&self) -> String {
        status_line(&self.entry, self.outcome)
    }
}

/// Formats the status line for one applied entry (also used by the
/// enable-camera and install summaries).
pub fn status_line(entry: &ConfigEntry, outcome: UpsertOutcome) -> String {
    match outcome {
        UpsertOutcome::Updated => format!("Updated: {entry}"),
        UpsertOutcome::Uncommented => format!("Uncommented and updated: {entry}"),
        UpsertOutcome::Appended => format!("Added: {entry}"),
    }
}

/// Validates `key`/`value` and upserts them into `store`.
///
/// # Errors
///
/// Returns [`SetConfigError::InvalidEntry`] for a malformed pair and
/// [`SetConfigError::Store`] if the store fails.
pub fn set_config(
    store: &mut dyn ConfigStore,
    key: &str,
    value: &str,
) -> Result<SetConfigReport, SetConfigError> {
    let entry = ConfigEntry::new(key, value)?;
    let outcome = store.upsert(&entry)?;
    Ok(SetConfigReport { entry, outcome })
}

#[cfg(test)]
mod tests {
    use super::*;
    use picam_core::BootConfigDocument;

    /// In-memory store used by application-layer tests.
    struct MemoryStore {
        doc: BootConfigDocument,
        fail: bool,
    }

    impl MemoryStore {
        fn with_text(text: &str) -> Self {
            Self {
                doc: BootConfigDocument::parse(text),
                fail: false,
            }
        }
    }

    impl ConfigStore for MemoryStore {
        fn upsert(&mut self, entry: &ConfigEntry) -> Result<UpsertOutcome, StoreError> {
            if self.fail {
                return Err(StoreError::NotFound {
                    path: PathBuf::from("/boot/config.txt"),
                });
            }
            Ok(self.doc.upsert(entry))
        }
    }

    #[test]
    fn test_set_config_reports_updated_for_active_key() {
        let mut store = MemoryStore::with_text("start_x=0\n");
        let report = set_config(&mut store, "start_x", "1").unwrap();
        assert_eq!(report.outcome, UpsertOutcome::Updated);
        assert_eq!(report.status_line(), "Updated: start_x=1");
    }

    #[test]
    fn test_set_config_reports_uncommented_for_commented_key() {
        let mut store = MemoryStore::with_text("#start_x=0\n");
        let report = set_config(&mut store, "start_x", "1").unwrap();
        assert_eq!(report.status_line(), "Uncommented and updated: start_x=1");
    }

    #[test]
    fn test_set_config_reports_added_for_absent_key() {
        let mut store = MemoryStore::with_text("");
        let report = set_config(&mut store, "gpu_mem", "128").unwrap();
        assert_eq!(report.status_line(), "Added: gpu_mem=128");
    }

    #[test]
    fn test_set_config_rejects_key_with_equals_before_touching_store() {
        let mut store = MemoryStore::with_text("start_x=0\n");
        let err = set_config(&mut store, "start_x=1", "1").unwrap_err();
        assert!(matches!(err, SetConfigError::InvalidEntry(_)));
        // The store must be untouched after a validation failure.
        assert_eq!(store.doc.render(), "start_x=0\n");
    }

    #[test]
    fn test_set_config_propagates_store_failure() {
        let mut store = MemoryStore::with_text("");
        store.fail = true;
        let err = set_config(&mut store, "start_x", "1").unwrap_err();
        assert!(matches!(err, SetConfigError::Store(StoreError::NotFound { .. })));
    }
}
