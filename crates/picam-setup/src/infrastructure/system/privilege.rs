//! Process privilege check.
//!
//! The installation use case takes the elevation result as an explicit
//! parameter; this module is the one place that actually inspects the
//! process.  On Linux the effective UID comes from `/proc/self/status`
//! (the `Uid:` line carries real, effective, saved, and filesystem UIDs).

use tracing::warn;

/// Effective UID of the current process, if it can be determined.
pub fn effective_uid() -> Option<u32> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_effective_uid(&status)
}

/// `true` when the process runs as root.
///
/// Returns `false` (with a warning) when the UID cannot be determined; the
/// install flow then refuses to run unless `--assume-root` is given.
pub fn is_elevated() -> bool {
    match effective_uid() {
        Some(uid) => uid == 0,
        None => {
            warn!("could not determine effective UID, assuming unprivileged");
            false
        }
    }
}

fn parse_effective_uid(status: &str) -> Option<u32> {
    let uid_line = status.lines().find(|l| l.starts_with("Uid:"))?;
    // "Uid:\t1000\t1000\t1000\t1000" — second field is the effective UID.
    uid_line.split_whitespace().nth(2)?.parse().ok()
}
