//! DoctorUseCase: read-only diagnosis of the camera setup.
//!
//! Inspects the boot configuration against the profile's expected entries and
//! probes the camera device nodes, producing a report the CLI prints line by
//! line.  Never mutates anything; it is the "why doesn't my camera work"
//! half of the repair flow, the upsert being the other half.
//!
//! The device probe is a closure so tests can diagnose without real device
//! nodes.

use std::fmt;
use std::path::{Path, PathBuf};

use picam_core::{BootConfigDocument, KeyState};

use crate::domain::profile::SetupProfile;

/// How one tracked boot-config key compares to its expected value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyFinding {
    /// Active and set to the expected value.
    Ok,
    /// Active but set to something else.
    WrongValue { actual: String },
    /// Present only in commented-out form.
    CommentedOut,
    /// No line for the key at all.
    Missing,
}

impl KeyFinding {
    /// `true` for the one healthy state.
    pub fn is_healthy(&self) -> bool {
        *self == KeyFinding::Ok
    }
}

/// Findings for one expected boot entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReport {
    pub key: String,
    pub expected: String,
    pub finding: KeyFinding,
}

impl fmt::Display for KeyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.finding {
            KeyFinding::Ok => write!(f, "ok      {}={}", self.key, self.expected),
            KeyFinding::WrongValue { actual } => write!(
                f,
                "WRONG   {}={} (expected {})",
                self.key, actual, self.expected
            ),
            KeyFinding::CommentedOut => write!(
                f,
                "OFF     {} is commented out (expected {}={})",
                self.key, self.key, self.expected
            ),
            KeyFinding::Missing => write!(
                f,
                "MISSING {} not set (expected {}={})",
                self.key, self.key, self.expected
            ),
        }
    }
}

/// Presence of one expected device node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceReport {
    pub path: PathBuf,
    pub present: bool,
}

impl fmt::Display for DeviceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.present {
            write!(f, "ok      device {} present", self.path.display())
        } else {
            write!(f, "MISSING device {} not found", self.path.display())
        }
    }
}

/// Full diagnosis result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    /// `false` when the boot config file itself could not be read.
    pub config_present: bool,
    pub keys: Vec<KeyReport>,
    pub devices: Vec<DeviceReport>,
}

impl DoctorReport {
    /// `true` when the config file exists, every key matches, and every
    /// device node is present.
    pub fn healthy(&self) -> bool {
        self.config_present
            && self.keys.iter().all(|k| k.finding.is_healthy())
            && self.devices.iter().all(|d| d.present)
    }
}

/// Diagnoses the setup.
///
/// `config_text` is the boot config contents, or `None` if the file could
/// not be read; `device_present` probes one device node (the CLI passes
/// `Path::exists`).
pub fn diagnose(
    config_text: Option<&str>,
    profile: &SetupProfile,
    device_present: impl Fn(&Path) -> bool,
) -> DoctorReport {
    let doc = config_text.map(BootConfigDocument::parse);

    let keys = profile
        .boot
        .entries
        .iter()
        .map(|entry| {
            let finding = match &doc {
                None => KeyFinding::Missing,
                Some(doc) => match doc.key_state(&entry.key) {
                    KeyState::Set(actual) if actual == entry.value => KeyFinding::Ok,
                    KeyState::Set(actual) => KeyFinding::WrongValue { actual },
                    KeyState::Commented(_) => KeyFinding::CommentedOut,
                    KeyState::Absent => KeyFinding::Missing,
                },
            };
            KeyReport {
                key: entry.key.clone(),
                expected: entry.value.clone(),
                finding,
            }
        })
        .collect();

    let devices = profile
        .devices
        .nodes
        .iter()
        .map(|path| DeviceReport {
            path: path.clone(),
            present: device_present(path),
        })
        .collect();

    DoctorReport {
        config_present: doc.is_some(),
        keys,
        devices,
    }
}
