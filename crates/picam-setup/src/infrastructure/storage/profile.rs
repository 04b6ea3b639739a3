//! TOML-based setup-profile loading.
//!
//! The profile is optional: with no `--profile` argument the built-in
//! defaults apply (they match the original installation scripts).  When a
//! path *is* given, the file must exist — a typo'd path silently falling
//! back to defaults would install the wrong thing.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::domain::profile::SetupProfile;

/// Error type for profile loading.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// A file system I/O error occurred (including a missing file).
    #[error("I/O error reading profile at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse profile TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads the setup profile.
///
/// `None` yields [`SetupProfile::default()`]; `Some(path)` reads and parses
/// the file.
///
/// # Errors
///
/// Returns [`ProfileError::Io`] if an explicitly given path cannot be read
/// and [`ProfileError::Parse`] if its TOML is malformed.
pub fn load_profile(path: Option<&Path>) -> Result<SetupProfile, ProfileError> {
    let Some(path) = path else {
        debug!("no profile path given, using built-in defaults");
        return Ok(SetupProfile::default());
    };

    let content = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let profile: SetupProfile = toml::from_str(&content)?;
    debug!(path = %path.display(), "profile loaded");
    Ok(profile)
}
