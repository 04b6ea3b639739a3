//! Service unit rendering.
//!
//! Builds the declarative unit definition the service manager consumes.  Pure
//! string construction from [`ServiceConfig`] plus the runtime username;
//! writing the file and enabling the unit are infrastructure concerns behind
//! the `ServiceManager` trait.

use std::path::PathBuf;

use super::profile::ServiceConfig;

/// A rendered service unit, ready to hand to the service manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUnit {
    /// File name of the unit, e.g. `picam.service`.
    pub file_name: String,
    /// Full unit text.
    pub contents: String,
}

impl ServiceUnit {
    /// Renders a unit that runs the camera application as `username` inside a
    /// graphical session, restarting on failure.
    pub fn render(config: &ServiceConfig, username: &str) -> Self {
        let file_name = format!("{}.service", config.name);
        let contents = format!(
            "[Unit]\n\
             Description={description}\n\
             After=graphical.target\n\
             \n\
             [Service]\n\
             Type=simple\n\
             User={username}\n\
             WorkingDirectory={working_dir}\n\
             ExecStart={exec_start}\n\
             Restart=on-failure\n\
             RestartSec=5\n\
             Environment=DISPLAY=:0\n\
             \n\
             [Install]\n\
             WantedBy=graphical.target\n",
            description = config.description,
            working_dir = config.working_dir.display(),
            exec_start = config.exec_start,
        );
        Self {
            file_name,
            contents,
        }
    }

    /// Path of the unit under the given service-manager unit directory.
    pub fn path_under(&self, unit_dir: &std::path::Path) -> PathBuf {
        unit_dir.join(&self.file_name)
    }
}
