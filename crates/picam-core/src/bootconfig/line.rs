//! Per-line classification of boot-configuration text.
//!
//! Every line of the file is kept, in order, as one [`ConfigLine`].  Lines
//! that do not parse as `key=value` or `#key=value` are preserved verbatim in
//! [`ConfigLine::Other`] so that rewriting the file never disturbs comments,
//! blank lines, or settings in formats this tool does not manage (e.g.
//! `key = value` with spaces, which the firmware may accept but the original
//! scripts never matched).
//!
//! Classification round-trips: for any input line,
//! `ConfigLine::parse(s).render() == s`.

use std::fmt;

/// One line of a boot-configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLine {
    /// An active `key=value` setting.
    Entry { key: String, value: String },
    /// A commented-out `#key=value` setting (no space between `#` and key).
    CommentedEntry { key: String, value: String },
    /// Anything else: comments, blank lines, unmanaged formats.
    Other(String),
}

impl ConfigLine {
    /// Classifies a single raw line (without its trailing newline).
    pub fn parse(raw: &str) -> ConfigLine {
        if let Some(rest) = raw.strip_prefix('#') {
            if let Some((key, value)) = split_entry(rest) {
                return ConfigLine::CommentedEntry {
                    key: key.to_string(),
                    value: value.to_string(),
                };
            }
        } else if let Some((key, value)) = split_entry(raw) {
            return ConfigLine::Entry {
                key: key.to_string(),
                value: value.to_string(),
            };
        }
        ConfigLine::Other(raw.to_string())
    }

    /// Returns the key if this line is an active entry for `key`.
    pub fn is_entry_for(&self, key: &str) -> bool {
        matches!(self, ConfigLine::Entry { key: k, .. } if k == key)
    }

    /// Returns `true` if this line is a commented-out entry for `key`.
    pub fn is_commented_entry_for(&self, key: &str) -> bool {
        matches!(self, ConfigLine::CommentedEntry { key: k, .. } if k == key)
    }

    /// Renders the line back to its textual form (no trailing newline).
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ConfigLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigLine::Entry { key, value } => write!(f, "{key}={value}"),
            ConfigLine::CommentedEntry { key, value } => write!(f, "#{key}={value}"),
            ConfigLine::Other(raw) => f.write_str(raw),
        }
    }
}

/// Splits `key=value` at the first `=`, returning `None` unless the key part
/// is a valid token (non-empty, no whitespace, no `#`, no `=`).
fn split_entry(s: &str) -> Option<(&str, &str)> {
    let (key, value) = s.split_once('=')?;
    if key.is_empty() || key.chars().any(|c| c.is_whitespace() || c == '#') {
        return None;
    }
    Some((key, value))
}
