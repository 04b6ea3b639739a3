//! Domain types for picam-setup.
//!
//! Plain structs with no file-system or process access: the setup profile
//! describing *what* to install, and the service unit rendering.  The
//! infrastructure layer is responsible for loading profiles from disk and
//! performing the side effects they describe.

pub mod profile;
pub mod unit;

pub use profile::{BootEntry, BootSection, DeviceConfig, ServiceConfig, SetupProfile};
pub use unit::ServiceUnit;
