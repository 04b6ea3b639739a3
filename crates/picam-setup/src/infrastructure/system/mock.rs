//! Mock OS collaborators for unit testing.
//!
//! # Why a mock system?
//!
//! The real adapters (`AptPackageManager`, `UsermodUserAdmin`, and friends)
//! invoke system utilities that:
//!
//! - Require root and a Debian-based host to run.
//! - Actually install packages and edit group membership on the test machine.
//! - Cannot be observed directly from Rust test code.
//!
//! `MockSystem` replaces every invocation with in-memory recording.  Each
//! call is pushed into a `Mutex<Vec<...>>` so test assertions can inspect
//! exactly what was invoked and in what order.
//!
//! # `fail_on` knob
//!
//! Set `fail_on` to a step label (`"package"`, `"group"`, `"device"`,
//! `"unit"`, `"enable"`) to make that collaborator return a
//! [`SystemError::CommandFailed`].  This lets you test the fail-fast
//! behaviour of the installation sequence without a broken OS.

use std::path::Path;
use std::sync::Mutex;

use crate::application::install::{
    DevicePermissions, PackageManager, ServiceManager, SystemError, UserAdmin,
};
use crate::domain::unit::ServiceUnit;

/// A mock implementation of all four collaborator traits.
#[derive(Default)]
pub struct MockSystem {
    /// Packages passed to `install`, in order.
    pub installed_packages: Mutex<Vec<String>>,
    /// `(username, group)` pairs passed to `add_to_group`.
    pub group_additions: Mutex<Vec<(String, String)>>,
    /// `(path, mode)` pairs passed to `set_mode`.
    pub device_modes: Mutex<Vec<(String, String)>>,
    /// Units passed to `install_unit`.
    pub installed_units: Mutex<Vec<ServiceUnit>>,
    /// Unit names passed to `enable`.
    pub enabled_units: Mutex<Vec<String>>,
    /// When set, the named step fails with a `CommandFailed` error.
    pub fail_on: Option<&'static str>,
}

impl MockSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose `fail_on` step reports failure.
    pub fn failing_on(step: &'static str) -> Self {
        Self {
            fail_on: Some(step),
            ..Self::default()
        }
    }

    fn check(&self, step: &'static str) -> Result<(), SystemError> {
        if self.fail_on == Some(step) {
            return Err(SystemError::CommandFailed {
                command: format!("mock {step}"),
                detail: "mock failure".to_string(),
            });
        }
        Ok(())
    }
}

impl PackageManager for MockSystem {
    /// Records the package, or fails if `fail_on == "package"`.
    fn install(&self, package: &str) -> Result<(), SystemError> {
        self.check("package")?;
        self.installed_packages
            .lock()
            .unwrap()
            .push(package.to_string());
        Ok(())
    }
}

impl UserAdmin for MockSystem {
    /// Records the membership change, or fails if `fail_on == "group"`.
    fn add_to_group(&self, username: &str, group: &str) -> Result<(), SystemError> {
        self.check("group")?;
        self.group_additions
            .lock()
            .unwrap()
            .push((username.to_string(), group.to_string()));
        Ok(())
    }
}

impl DevicePermissions for MockSystem {
    /// Records the mode change, or fails if `fail_on == "device"`.
    fn set_mode(&self, path: &Path, mode: &str) -> Result<(), SystemError> {
        self.check("device")?;
        self.device_modes
            .lock()
            .unwrap()
            .push((path.display().to_string(), mode.to_string()));
        Ok(())
    }
}

impl ServiceManager for MockSystem {
    /// Records the unit, or fails if `fail_on == "unit"`.
    fn install_unit(&self, unit: &ServiceUnit) -> Result<(), SystemError> {
        self.check("unit")?;
        self.installed_units.lock().unwrap().push(unit.clone());
        Ok(())
    }

    /// Records the enablement, or fails if `fail_on == "enable"`.
    fn enable(&self, unit_name: &str) -> Result<(), SystemError> {
        self.check("enable")?;
        self.enabled_units
            .lock()
            .unwrap()
            .push(unit_name.to_string());
        Ok(())
    }
}
