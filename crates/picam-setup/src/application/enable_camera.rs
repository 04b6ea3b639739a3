//! EnableCameraUseCase: enforce the camera boot-config entries.
//!
//! This is the repair path ("fix camera"): for each entry in the profile's
//! boot section, run the three-way upsert and collect the per-entry outcome.
//! The caller is responsible for backing the file up *before* invoking this
//! use case; the CLI copies the target to a timestamped sibling first and the
//! install flow relies on the package-manager transaction already having
//! succeeded.

use picam_core::{ConfigEntry, EntryError, UpsertOutcome};
use thiserror::Error;

use crate::application::set_config::{ConfigStore, StoreError};
use crate::domain::profile::BootEntry;

/// Error type for the enable-camera use case.
#[derive(Debug, Error)]
pub enum EnableCameraError {
    /// A profile boot entry failed validation.
    #[error("invalid boot entry: {0}")]
    InvalidEntry(#[from] EntryError),

    /// The config store could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Per-entry outcomes, in the order the entries were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnableCameraReport {
    pub outcomes: Vec<(ConfigEntry, UpsertOutcome)>,
}

impl EnableCameraReport {
    /// `true` if every entry was already active (all outcomes `Updated`);
    /// on an already-repaired file this is the idempotent no-op case.
    pub fn all_already_active(&self) -> bool {
        self.outcomes
            .iter()
            .all(|(_, o)| *o == UpsertOutcome::Updated)
    }
}

/// Applies every boot entry to the store, fail-fast on the first error.
///
/// # Errors
///
/// Returns [`EnableCameraError::InvalidEntry`] if a profile entry is
/// malformed and [`EnableCameraError::Store`] if the store fails; entries
/// before the failing one remain applied (the surrounding flow stops on
/// first error by design).
pub fn enable_camera(
    store: &mut dyn ConfigStore,
    entries: &[BootEntry],
) -> Result<EnableCameraReport, EnableCameraError> {
    let mut outcomes = Vec::with_capacity(entries.len());
    for boot_entry in entries {
        let entry = boot_entry.to_config_entry()?;
        let outcome = store.upsert(&entry)?;
        tracing::info!(key = entry.key(), ?outcome, "boot entry enforced");
        outcomes.push((entry, outcome));
    }
    Ok(EnableCameraReport { outcomes })
}
