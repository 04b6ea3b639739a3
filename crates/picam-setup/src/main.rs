//! picam-setup — entry point.
//!
//! Installer and repair tool for the Raspberry Pi camera application.  The
//! hard part of the original setup flow was safely editing the firmware boot
//! configuration; that lives in `picam-core` as an idempotent three-way
//! upsert.  Everything else (packages, group membership, device permissions,
//! the service unit) is delegated to the OS utilities through the
//! collaborator traits in the application layer.
//!
//! # Usage
//!
//! ```text
//! picam-setup set <KEY> <VALUE> [--file <PATH>]
//! picam-setup enable-camera [--file <PATH>] [--profile <PATH>]
//! picam-setup install --user <NAME> [--profile <PATH>] [--assume-root]
//! picam-setup doctor [--file <PATH>] [--profile <PATH>]
//! ```
//!
//! Every command exits 0 on success and non-zero on failure, printing status
//! lines to stdout and the failing step's message to stderr.  `doctor` also
//! exits non-zero when it finds problems, so scripts can gate on it.
//!
//! # Architecture overview
//!
//! ```text
//! picam-setup  ← this binary
//!   domain/          SetupProfile, ServiceUnit rendering
//!   application/     set_config, enable_camera, install, doctor use cases
//!   infrastructure/
//!     storage/       file-backed ConfigStore, backups, profile loading
//!     system/        apt-get / usermod / chmod / systemctl adapters
//!       ↕
//! picam-core   BootConfigDocument — the upsert engine
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use picam_setup::application::doctor::diagnose;
use picam_setup::application::enable_camera::enable_camera;
use picam_setup::application::install::{InstallRequest, InstallUseCase};
use picam_setup::application::set_config::{set_config, status_line};
use picam_setup::infrastructure::storage::{backup_file, load_profile, FileConfigStore};
use picam_setup::infrastructure::system::{
    is_elevated, AptPackageManager, ChmodDevicePermissions, SystemctlServiceManager,
    UsermodUserAdmin,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Installer and boot-config repair tool for the Raspberry Pi camera
/// application.
#[derive(Debug, Parser)]
#[command(name = "picam-setup", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ensure one key=value line is present and active in a config file.
    Set {
        /// Setting name (no `=`, no whitespace).
        key: String,
        /// Value to enforce (single line).
        value: String,
        /// Target configuration file.
        #[arg(long, default_value = "/boot/config.txt")]
        file: PathBuf,
    },
    /// Back up the boot config, then enforce the camera entries from the
    /// profile (start_x, gpu_mem, camera_auto_detect by default).
    EnableCamera {
        /// Boot config file; overrides the profile's path.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Setup profile TOML; built-in defaults when omitted.
        #[arg(long)]
        profile: Option<PathBuf>,
    },
    /// Full installation: packages, group access, device permissions,
    /// service unit, boot config.
    Install {
        /// User who will run the camera application.
        #[arg(long)]
        user: String,
        /// Setup profile TOML; built-in defaults when omitted.
        #[arg(long)]
        profile: Option<PathBuf>,
        /// Skip the privilege check (containers and tests).
        #[arg(long)]
        assume_root: bool,
    },
    /// Read-only diagnosis: boot config entries and camera device nodes.
    Doctor {
        /// Boot config file; overrides the profile's path.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Setup profile TOML; built-in defaults when omitted.
        #[arg(long)]
        profile: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Set { key, value, file } => run_set(&key, &value, file),
        Command::EnableCamera { file, profile } => run_enable_camera(file, profile.as_deref()),
        Command::Install {
            user,
            profile,
            assume_root,
        } => run_install(&user, profile.as_deref(), assume_root),
        Command::Doctor { file, profile } => run_doctor(file, profile.as_deref()),
    }
}

fn run_set(key: &str, value: &str, file: PathBuf) -> anyhow::Result<()> {
    let mut store = FileConfigStore::new(file);
    let report = set_config(&mut store, key, value)
        .with_context(|| format!("could not set {key} in {}", store.path().display()))?;
    println!("{}", report.status_line());
    Ok(())
}

fn run_enable_camera(
    file: Option<PathBuf>,
    profile_path: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let profile = load_profile(profile_path).context("could not load setup profile")?;
    let config_path = file.unwrap_or_else(|| profile.boot.config_path.clone());

    // Backup before the first mutation — caller-side policy, matching the
    // original flow.
    let backup = backup_file(&config_path)
        .with_context(|| format!("could not back up {}", config_path.display()))?;
    println!("Backup written: {}", backup.display());

    let mut store = FileConfigStore::new(config_path);
    let report = enable_camera(&mut store, &profile.boot.entries)
        .context("could not update boot configuration")?;
    for (entry, outcome) in &report.outcomes {
        println!("{}", status_line(entry, *outcome));
    }
    if report.all_already_active() {
        info!("camera entries were already active");
    }
    println!("Camera enabled. Reboot for the changes to take effect.");
    Ok(())
}

fn run_install(
    user: &str,
    profile_path: Option<&std::path::Path>,
    assume_root: bool,
) -> anyhow::Result<()> {
    let profile = load_profile(profile_path).context("could not load setup profile")?;
    let request = InstallRequest {
        username: user.to_string(),
        elevated: assume_root || is_elevated(),
    };

    let apt = AptPackageManager;
    let usermod = UsermodUserAdmin;
    let chmod = ChmodDevicePermissions;
    let systemctl = SystemctlServiceManager::system();
    let use_case = InstallUseCase {
        packages: &apt,
        users: &usermod,
        devices: &chmod,
        services: &systemctl,
    };

    let mut store = FileConfigStore::new(profile.boot.config_path.clone());
    let report = use_case
        .run(&profile, &request, &mut store)
        .context("installation failed")?;

    println!("Installed packages: {}", report.packages.join(", "));
    println!("Added {user} to group: {}", report.group);
    println!("Device nodes opened: {}", report.devices.join(", "));
    println!("Service unit installed and enabled: {}", report.unit_file);
    for (entry, outcome) in &report.boot_outcomes {
        println!("{}", status_line(entry, *outcome));
    }
    println!("Installation complete. Reboot, then log in as {user}.");
    Ok(())
}

fn run_doctor(
    file: Option<PathBuf>,
    profile_path: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let profile = load_profile(profile_path).context("could not load setup profile")?;
    let config_path = file.unwrap_or_else(|| profile.boot.config_path.clone());

    let config_text = std::fs::read_to_string(&config_path).ok();
    if config_text.is_none() {
        println!("MISSING boot config {} not readable", config_path.display());
    }

    let report = diagnose(
        config_text.as_deref(),
        &profile,
        |path: &std::path::Path| path.exists(),
    );
    for key in &report.keys {
        println!("{key}");
    }
    for device in &report.devices {
        println!("{device}");
    }

    if report.healthy() {
        println!("Camera setup looks healthy.");
        Ok(())
    } else {
        println!("Problems found. Run `picam-setup enable-camera` (and reboot) to repair.");
        std::process::exit(1);
    }
}
