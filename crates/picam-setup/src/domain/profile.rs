//! Setup-profile schema.
//!
//! [`SetupProfile`] is the single source of truth for what an installation
//! enforces: the packages to install, the group granting camera access, the
//! device nodes to open up, the service unit parameters, and the boot-config
//! entries to upsert.
//!
//! Every field carries a serde default matching the behaviour of the original
//! installation scripts, so the tool works with no profile file at all and
//! tolerates partial profiles written by hand.  Example profile:
//!
//! ```toml
//! packages = ["python3-picamera2", "python3-opencv"]
//! group = "video"
//!
//! [boot]
//! config_path = "/boot/config.txt"
//! entries = [
//!     { key = "start_x", value = "1" },
//!     { key = "gpu_mem", value = "128" },
//! ]
//!
//! [devices]
//! nodes = ["/dev/video0"]
//! mode = "0666"
//!
//! [service]
//! name = "picam"
//! exec_start = "/usr/bin/python3 /opt/picam/camera_launcher.py"
//! ```
//!
//! # Design rationale
//!
//! Keeping the profile as a plain struct (no global state, no environment
//! variable reads inside the domain) makes every use case easy to drive from
//! tests.  The infrastructure layer populates it from TOML.

use std::path::PathBuf;

use picam_core::{ConfigEntry, EntryError};
use serde::{Deserialize, Serialize};

/// Top-level description of one installation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetupProfile {
    /// OS packages the camera application needs.
    #[serde(default = "default_packages")]
    pub packages: Vec<String>,
    /// Group whose members may access the camera devices.
    #[serde(default = "default_group")]
    pub group: String,
    #[serde(default)]
    pub boot: BootSection,
    #[serde(default)]
    pub devices: DeviceConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

/// Boot-configuration file path and the entries enforced in it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BootSection {
    /// Path of the firmware boot configuration file.
    #[serde(default = "default_config_path")]
    pub config_path: PathBuf,
    /// Entries to upsert, in order.
    #[serde(default = "default_boot_entries")]
    pub entries: Vec<BootEntry>,
}

/// One `key=value` pair to enforce in the boot configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BootEntry {
    pub key: String,
    pub value: String,
}

impl BootEntry {
    /// Validates this pair into a [`ConfigEntry`].
    ///
    /// # Errors
    ///
    /// Returns the underlying [`EntryError`] if the key or value is malformed
    /// (profiles are user-written TOML, so this is a reachable path).
    pub fn to_config_entry(&self) -> Result<ConfigEntry, EntryError> {
        ConfigEntry::new(self.key.clone(), self.value.clone())
    }
}

/// Camera device nodes and the permission mode applied to them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    /// Device nodes the application reads frames from.
    #[serde(default = "default_device_nodes")]
    pub nodes: Vec<PathBuf>,
    /// Octal permission mode string passed to the permission utility.
    #[serde(default = "default_device_mode")]
    pub mode: String,
}

/// Parameters for the generated service unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    /// Unit name without the `.service` suffix.
    #[serde(default = "default_service_name")]
    pub name: String,
    /// Human-readable unit description.
    #[serde(default = "default_service_description")]
    pub description: String,
    /// Directory the application runs from.
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
    /// Command line the service manager executes.
    #[serde(default = "default_exec_start")]
    pub exec_start: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_packages() -> Vec<String> {
    [
        "python3-picamera2",
        "python3-opencv",
        "python3-pil",
        "python3-tk",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_group() -> String {
    "video".to_string()
}
fn default_config_path() -> PathBuf {
    PathBuf::from("/boot/config.txt")
}
fn default_boot_entries() -> Vec<BootEntry> {
    vec![
        BootEntry {
            key: "start_x".to_string(),
            value: "1".to_string(),
        },
        BootEntry {
            key: "gpu_mem".to_string(),
            value: "128".to_string(),
        },
        BootEntry {
            key: "camera_auto_detect".to_string(),
            value: "1".to_string(),
        },
    ]
}
fn default_device_nodes() -> Vec<PathBuf> {
    vec![PathBuf::from("/dev/video0")]
}
fn default_device_mode() -> String {
    "0666".to_string()
}
fn default_service_name() -> String {
    "picam".to_string()
}
fn default_service_description() -> String {
    "Raspberry Pi camera application".to_string()
}
fn default_working_dir() -> PathBuf {
    PathBuf::from("/opt/picam")
}
fn default_exec_start() -> String {
    "/usr/bin/python3 /opt/picam/camera_launcher.py".to_string()
}

impl Default for SetupProfile {
    fn default() -> Self {
        Self {
            packages: default_packages(),
            group: default_group(),
            boot: BootSection::default(),
            devices: DeviceConfig::default(),
            service: ServiceConfig::default(),
        }
    }
}

impl Default for BootSection {
    fn default() -> Self {
        Self {
            config_path: default_config_path(),
            entries: default_boot_entries(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            nodes: default_device_nodes(),
            mode: default_device_mode(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            description: default_service_description(),
            working_dir: default_working_dir(),
            exec_start: default_exec_start(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_enforces_camera_boot_entries() {
        let profile = SetupProfile::default();
        let keys: Vec<&str> = profile.boot.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["start_x", "gpu_mem", "camera_auto_detect"]);
        assert_eq!(profile.boot.config_path, PathBuf::from("/boot/config.txt"));
    }

    #[test]
    fn test_default_profile_uses_video_group() {
        let profile = SetupProfile::default();
        assert_eq!(profile.group, "video");
        assert!(!profile.packages.is_empty());
    }

    #[test]
    fn test_profile_round_trips_through_toml() {
        let mut profile = SetupProfile::default();
        profile.group = "camera".to_string();
        profile.boot.entries.push(BootEntry {
            key: "disable_camera_led".to_string(),
            value: "1".to_string(),
        });

        let toml_str = toml::to_string_pretty(&profile).expect("serialize");
        let restored: SetupProfile = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(profile, restored);
    }

    #[test]
    fn test_deserialize_empty_toml_uses_all_defaults() {
        let profile: SetupProfile = toml::from_str("").expect("deserialize empty");
        assert_eq!(profile, SetupProfile::default());
    }

    #[test]
    fn test_deserialize_partial_toml_overrides_only_named_fields() {
        let toml_str = r#"
group = "camera"

[boot]
config_path = "/boot/firmware/config.txt"
"#;
        let profile: SetupProfile = toml::from_str(toml_str).expect("deserialize partial");
        assert_eq!(profile.group, "camera");
        assert_eq!(
            profile.boot.config_path,
            PathBuf::from("/boot/firmware/config.txt")
        );
        // Unnamed fields keep their defaults.
        assert_eq!(profile.boot.entries, SetupProfile::default().boot.entries);
        assert_eq!(profile.devices.mode, "0666");
    }

    #[test]
    fn test_boot_entry_validation_rejects_bad_key() {
        let entry = BootEntry {
            key: "start x".to_string(),
            value: "1".to_string(),
        };
        assert!(entry.to_config_entry().is_err());
    }
}
