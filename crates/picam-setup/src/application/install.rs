//! InstallUseCase: the full installation sequence.
//!
//! Orchestrates the external collaborators in the same order the original
//! installation flow ran them, fail-fast (the first failed step aborts the
//! whole installation and its message is what the user sees):
//!
//! 1. Precondition: the caller must already hold elevated privileges.  The
//!    elevation result is passed in explicitly; this use case never inspects
//!    ambient process state.
//! 2. Install the OS packages the camera application needs.
//! 3. Add the target user to the camera-access group.
//! 4. Open up the camera device nodes.
//! 5. Install and enable the service unit.
//! 6. Enforce the boot-config entries (the upsert engine).
//!
//! Every side effect goes through a trait defined here at the application
//! seam.  Real adapters shell out to `apt-get`, `usermod`, `chmod`, and
//! `systemctl` in the infrastructure layer; tests drive the sequence with a
//! recording mock instead.

use thiserror::Error;
use tracing::info;

use picam_core::{ConfigEntry, UpsertOutcome};

use crate::application::enable_camera::{enable_camera, EnableCameraError};
use crate::application::set_config::ConfigStore;
use crate::domain::profile::SetupProfile;
use crate::domain::unit::ServiceUnit;

/// Error type for collaborator invocations.
#[derive(Debug, Error)]
pub enum SystemError {
    /// The collaborator process could not be spawned at all.
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The collaborator ran and reported failure.
    #[error("{command} failed: {detail}")]
    CommandFailed { command: String, detail: String },

    /// A file the collaborator needed could not be written.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Installs named OS packages (the package manager is invoked, never
/// re-implemented).
pub trait PackageManager {
    /// Installs a single package, returning after the package manager exits.
    fn install(&self, package: &str) -> Result<(), SystemError>;
}

/// Adds users to groups.
pub trait UserAdmin {
    /// Appends `username` to `group` membership.
    fn add_to_group(&self, username: &str, group: &str) -> Result<(), SystemError>;
}

/// Adjusts device-node permission modes.
pub trait DevicePermissions {
    /// Applies the octal `mode` string to the device node at `path`.
    fn set_mode(&self, path: &std::path::Path, mode: &str) -> Result<(), SystemError>;
}

/// Installs and enables service units.
pub trait ServiceManager {
    /// Writes the unit definition where the service manager will find it.
    fn install_unit(&self, unit: &ServiceUnit) -> Result<(), SystemError>;
    /// Enables the unit so it starts on boot.
    fn enable(&self, unit_name: &str) -> Result<(), SystemError>;
}

/// Error type for the installation sequence; each variant names the step
/// that failed.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("installation requires elevated privileges (re-run with sudo)")]
    NotElevated,

    #[error("package installation failed for {package}")]
    Package {
        package: String,
        #[source]
        source: SystemError,
    },

    #[error("adding user {username} to group {group} failed")]
    Group {
        username: String,
        group: String,
        #[source]
        source: SystemError,
    },

    #[error("setting permissions on device {device} failed")]
    Device {
        device: String,
        #[source]
        source: SystemError,
    },

    #[error("service unit installation failed for {unit}")]
    Unit {
        unit: String,
        #[source]
        source: SystemError,
    },

    #[error("boot configuration update failed")]
    BootConfig(#[from] EnableCameraError),
}

/// What the caller must decide before installing.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// User who will run the camera application (joined to the access group
    /// and set as the service user).
    pub username: String,
    /// Result of the caller's privilege check.  Never read from the
    /// environment here.
    pub elevated: bool,
}

/// Everything the installation changed, for the final summary.
#[derive(Debug)]
pub struct InstallReport {
    pub packages: Vec<String>,
    pub group: String,
    pub devices: Vec<String>,
    pub unit_file: String,
    pub boot_outcomes: Vec<(ConfigEntry, UpsertOutcome)>,
}

/// The installation sequence over its four collaborators.
pub struct InstallUseCase<'a> {
    pub packages: &'a dyn PackageManager,
    pub users: &'a dyn UserAdmin,
    pub devices: &'a dyn DevicePermissions,
    pub services: &'a dyn ServiceManager,
}

impl<'a> InstallUseCase<'a> {
    /// Runs the full sequence.  Stops at the first failing step.
    ///
    /// # Errors
    ///
    /// Returns the [`InstallError`] variant naming the failed step.  Steps
    /// completed before the failure are not rolled back (matching the
    /// original fail-fast installation flow).
    pub fn run(
        &self,
        profile: &SetupProfile,
        request: &InstallRequest,
        store: &mut dyn ConfigStore,
    ) -> Result<InstallReport, InstallError> {
        if !request.elevated {
            return Err(InstallError::NotElevated);
        }

        for package in &profile.packages {
            info!(%package, "installing package");
            self.packages
                .install(package)
                .map_err(|source| InstallError::Package {
                    package: package.clone(),
                    source,
                })?;
        }

        info!(user = %request.username, group = %profile.group, "granting camera group access");
        self.users
            .add_to_group(&request.username, &profile.group)
            .map_err(|source| InstallError::Group {
                username: request.username.clone(),
                group: profile.group.clone(),
                source,
            })?;

        for node in &profile.devices.nodes {
            info!(device = %node.display(), mode = %profile.devices.mode, "setting device mode");
            self.devices
                .set_mode(node, &profile.devices.mode)
                .map_err(|source| InstallError::Device {
                    device: node.display().to_string(),
                    source,
                })?;
        }

        let unit = ServiceUnit::render(&profile.service, &request.username);
        info!(unit = %unit.file_name, "installing service unit");
        self.services
            .install_unit(&unit)
            .map_err(|source| InstallError::Unit {
                unit: unit.file_name.clone(),
                source,
            })?;
        self.services
            .enable(&unit.file_name)
            .map_err(|source| InstallError::Unit {
                unit: unit.file_name.clone(),
                source,
            })?;

        let boot_report = enable_camera(store, &profile.boot.entries)?;

        Ok(InstallReport {
            packages: profile.packages.clone(),
            group: profile.group.clone(),
            devices: profile
                .devices
                .nodes
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            unit_file: unit.file_name,
            boot_outcomes: boot_report.outcomes,
        })
    }
}
