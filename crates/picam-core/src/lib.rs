//! # picam-core
//!
//! Shared library for picam-setup containing the boot-configuration line
//! model and the idempotent key=value upsert engine.
//!
//! This crate is used by the `picam-setup` binary and its tests.
//! It has zero dependencies on OS APIs, the file system, or process spawning.
//!
//! # What is the boot configuration file? (for beginners)
//!
//! Raspberry Pi firmware reads a plain-text file (historically
//! `/boot/config.txt`) at power-on to decide which hardware interfaces to
//! enable.  Each setting is one line of the form `key=value`; a leading `#`
//! comments a setting out:
//!
//! ```text
//! # Enable the camera module
//! start_x=1
//! gpu_mem=128
//! #disable_overscan=1
//! ```
//!
//! Enabling the camera means making sure `start_x=1` and `gpu_mem=128` are
//! present and uncommented without disturbing anything else in the file.
//! That "ensure this line" operation is the upsert this crate implements:
//!
//! - **`bootconfig::line`** – classifies one raw line as a `key=value`
//!   entry, a `#key=value` commented entry, or an unrelated line.
//!
//! - **`bootconfig::document`** – an ordered, in-memory line buffer parsed
//!   from the whole file, with the three-way upsert (update in place,
//!   uncomment and set, or append) and a read-only key inspection API used
//!   by diagnostics.

// Rust will look for the module in a subdirectory with the same name
// (src/bootconfig/mod.rs).
pub mod bootconfig;

// Re-export the most-used types at the crate root so callers can write
// `picam_core::ConfigEntry` instead of `picam_core::bootconfig::document::ConfigEntry`.
pub use bootconfig::document::{BootConfigDocument, ConfigEntry, EntryError, KeyState, UpsertOutcome};
pub use bootconfig::line::ConfigLine;
