//! Timestamped backup copies of the boot configuration.
//!
//! Backup-before-mutate is a *caller* policy, not part of the upsert
//! contract: the CLI's repair command copies the target aside before its
//! first upsert, exactly as the original flow copied the file to a
//! timestamped path before editing it.
//!
//! Backup names are `<file-name>.bak.<unix-seconds>` next to the target,
//! e.g. `/boot/config.txt.bak.1693400000`.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use crate::application::set_config::StoreError;

/// Copies `path` to a timestamped sibling and returns the backup path.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] / [`StoreError::PermissionDenied`] /
/// [`StoreError::Io`] if the target cannot be read or the copy cannot be
/// written.
pub fn backup_file(path: &Path) -> Result<PathBuf, StoreError> {
    let backup_path = backup_path_for(path, unix_seconds());
    std::fs::copy(path, &backup_path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => StoreError::NotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => StoreError::PermissionDenied {
            path: backup_path.clone(),
        },
        _ => StoreError::Io {
            path: backup_path.clone(),
            source,
        },
    })?;
    info!(original = %path.display(), backup = %backup_path.display(), "backup written");
    Ok(backup_path)
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn backup_path_for(path: &Path, seconds: u64) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config".to_string());
    path.with_file_name(format!("{file_name}.bak.{seconds}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_path_is_timestamped_sibling() {
        let path = backup_path_for(Path::new("/boot/config.txt"), 1693400000);
        assert_eq!(path, PathBuf::from("/boot/config.txt.bak.1693400000"));
    }

    #[test]
    fn test_backup_of_missing_file_is_not_found() {
        let err = backup_file(Path::new("/nonexistent/path/config.txt")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
