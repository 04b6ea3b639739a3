//! OS collaborator adapters.
//!
//! Real adapters shell out to the system utilities (`apt-get`, `usermod`,
//! `chmod`, `systemctl`); the mock records calls in memory for tests.

pub mod linux;
pub mod mock;
pub mod privilege;

pub use linux::{
    AptPackageManager, ChmodDevicePermissions, SystemctlServiceManager, UsermodUserAdmin,
};
pub use mock::MockSystem;
pub use privilege::is_elevated;
