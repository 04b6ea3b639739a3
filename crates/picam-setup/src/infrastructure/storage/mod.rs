//! File-system persistence: the boot-config file store, backup copies, and
//! setup-profile loading.

pub mod backup;
pub mod boot_config;
pub mod profile;

pub use backup::backup_file;
pub use boot_config::FileConfigStore;
pub use profile::{load_profile, ProfileError};
