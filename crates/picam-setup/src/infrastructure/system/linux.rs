//! Linux adapters for the collaborator traits.
//!
//! Each adapter invokes the corresponding system utility and maps a non-zero
//! exit status to [`SystemError::CommandFailed`] carrying the utility's
//! stderr.  Nothing here re-implements what the utilities do; they are the
//! external collaborators the design treats as given.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::application::install::{
    DevicePermissions, PackageManager, ServiceManager, SystemError, UserAdmin,
};
use crate::domain::unit::ServiceUnit;

/// Runs a prepared command, mapping spawn failures and non-zero exits.
fn run_checked(command: &mut Command, description: &str) -> Result<(), SystemError> {
    debug!(command = description, "invoking system utility");
    let output = command.output().map_err(|source| SystemError::Spawn {
        command: description.to_string(),
        source,
    })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = match stderr.trim() {
            "" => format!("exit status {}", output.status),
            msg => msg.to_string(),
        };
        return Err(SystemError::CommandFailed {
            command: description.to_string(),
            detail,
        });
    }
    Ok(())
}

/// `apt-get install -y <package>`.
#[derive(Debug, Default)]
pub struct AptPackageManager;

impl PackageManager for AptPackageManager {
    fn install(&self, package: &str) -> Result<(), SystemError> {
        run_checked(
            Command::new("apt-get")
                .args(["install", "-y"])
                .arg(package)
                .env("DEBIAN_FRONTEND", "noninteractive"),
            &format!("apt-get install -y {package}"),
        )
    }
}

/// `usermod -aG <group> <user>`.
#[derive(Debug, Default)]
pub struct UsermodUserAdmin;

impl UserAdmin for UsermodUserAdmin {
    fn add_to_group(&self, username: &str, group: &str) -> Result<(), SystemError> {
        run_checked(
            Command::new("usermod").args(["-aG", group, username]),
            &format!("usermod -aG {group} {username}"),
        )
    }
}

/// `chmod <mode> <device>`.
#[derive(Debug, Default)]
pub struct ChmodDevicePermissions;

impl DevicePermissions for ChmodDevicePermissions {
    fn set_mode(&self, path: &Path, mode: &str) -> Result<(), SystemError> {
        run_checked(
            Command::new("chmod").arg(mode).arg(path),
            &format!("chmod {mode} {}", path.display()),
        )
    }
}

/// Writes units into a unit directory and enables them with `systemctl`.
#[derive(Debug)]
pub struct SystemctlServiceManager {
    unit_dir: std::path::PathBuf,
}

impl SystemctlServiceManager {
    /// The standard system unit directory.
    pub fn system() -> Self {
        Self {
            unit_dir: std::path::PathBuf::from("/etc/systemd/system"),
        }
    }

    /// A custom unit directory (used by tests to write under a temp dir).
    pub fn with_unit_dir(unit_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            unit_dir: unit_dir.into(),
        }
    }
}

impl ServiceManager for SystemctlServiceManager {
    fn install_unit(&self, unit: &ServiceUnit) -> Result<(), SystemError> {
        let path = unit.path_under(&self.unit_dir);
        std::fs::write(&path, &unit.contents)
            .map_err(|source| SystemError::Io { path, source })?;
        // Tell the service manager to pick up the new unit file.
        run_checked(
            Command::new("systemctl").arg("daemon-reload"),
            "systemctl daemon-reload",
        )
    }

    fn enable(&self, unit_name: &str) -> Result<(), SystemError> {
        run_checked(
            Command::new("systemctl").args(["enable", unit_name]),
            &format!("systemctl enable {unit_name}"),
        )
    }
}
