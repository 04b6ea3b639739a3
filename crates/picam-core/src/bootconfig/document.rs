//! Whole-file line buffer and the idempotent upsert.
//!
//! The entire file is read into a [`BootConfigDocument`] (boot config files
//! are small, well under 1000 lines), mutated in memory, and rendered back.
//! No streaming is involved.
//!
//! # The three-way upsert (for beginners)
//!
//! "Upsert" means *update if present, else insert*.  For a boot setting the
//! present/absent distinction has a middle state — present but commented out —
//! so the algorithm tries three cases in priority order, first match wins:
//!
//! 1. An active `key=` line exists → replace the whole line. → [`UpsertOutcome::Updated`]
//! 2. A commented `#key=` line exists → uncomment it and set the value
//!    (converted in place, never duplicated). → [`UpsertOutcome::Uncommented`]
//! 3. Neither exists → append `key=value` as a new final line. → [`UpsertOutcome::Appended`]
//!
//! Running the same upsert twice leaves the document byte-identical after the
//! first run; the second run reports `Updated`.
//!
//! # Duplicate keys (malformed input)
//!
//! A file containing two active `key=` lines is malformed.  The policy is
//! deterministic: only the **first** matching line is modified, the rest are
//! left untouched.

use thiserror::Error;
use tracing::debug;

use super::line::ConfigLine;

/// Error type for [`ConfigEntry`] validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    /// The key was empty.
    #[error("config key must not be empty")]
    EmptyKey,

    /// The key contained a character that would break the `key=value` format.
    #[error("config key {key:?} contains invalid character {found:?}")]
    InvalidKeyCharacter { key: String, found: char },

    /// The value contained a newline, which would split it into two lines.
    #[error("config value for {key:?} must not contain a newline")]
    ValueContainsNewline { key: String },
}

/// A validated `(key, value)` pair the caller wants enforced in the file.
///
/// Construction is the only validation point: every `ConfigEntry` in
/// existence has a non-empty key free of `=`, `#`, and whitespace, and a
/// value free of newlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    key: String,
    value: String,
}

impl ConfigEntry {
    /// Validates and builds an entry.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::EmptyKey`] for an empty key,
    /// [`EntryError::InvalidKeyCharacter`] if the key contains `=`, `#`, or
    /// whitespace, and [`EntryError::ValueContainsNewline`] if the value
    /// contains `\n` or `\r`.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Result<Self, EntryError> {
        let key = key.into();
        let value = value.into();

        if key.is_empty() {
            return Err(EntryError::EmptyKey);
        }
        if let Some(found) = key
            .chars()
            .find(|c| *c == '=' || *c == '#' || c.is_whitespace())
        {
            return Err(EntryError::InvalidKeyCharacter { key, found });
        }
        if value.contains('\n') || value.contains('\r') {
            return Err(EntryError::ValueContainsNewline { key });
        }

        Ok(Self { key, value })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for ConfigEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Which of the three upsert cases applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// An active `key=` line existed and was replaced in place.
    Updated,
    /// A commented `#key=` line existed and was converted to an active line.
    Uncommented,
    /// No line for the key existed; a new line was appended.
    Appended,
}

/// Read-only state of a key within a document, used by diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyState {
    /// An active `key=value` line exists; carries the value of the first one.
    Set(String),
    /// Only a commented `#key=value` line exists; carries its value.
    Commented(String),
    /// No line for the key exists in either form.
    Absent,
}

/// An ordered, in-memory representation of one boot-configuration file.
///
/// Parsing and rendering are lossless: `BootConfigDocument::parse(s).render()`
/// returns `s` for any input.  The only mutation is [`upsert`](Self::upsert).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootConfigDocument {
    lines: Vec<ConfigLine>,
    /// Whether the source text ended with a newline.  Preserved on render so
    /// an update-in-place never changes bytes it did not target; an append
    /// always leaves the file newline-terminated.
    trailing_newline: bool,
}

impl BootConfigDocument {
    /// Parses the full text of a configuration file.
    pub fn parse(text: &str) -> Self {
        let trailing_newline = text.ends_with('\n');
        let body = text.strip_suffix('\n').unwrap_or(text);
        let lines = if text.is_empty() {
            Vec::new()
        } else {
            // "\n" parses to a single blank line so a lone newline survives
            // the round trip.
            body.split('\n').map(ConfigLine::parse).collect()
        };
        Self {
            lines,
            trailing_newline,
        }
    }

    /// Renders the document back to file text.
    pub fn render(&self) -> String {
        let mut out = self
            .lines
            .iter()
            .map(ConfigLine::render)
            .collect::<Vec<_>>()
            .join("\n");
        if self.trailing_newline && !self.lines.is_empty() {
            out.push('\n');
        }
        out
    }

    /// Ensures `entry.key()=entry.value()` is present and active.
    ///
    /// See the module docs for the three-way algorithm.  Only the first
    /// matching line is modified.
    pub fn upsert(&mut self, entry: &ConfigEntry) -> UpsertOutcome {
        if let Some(idx) = self.lines.iter().position(|l| l.is_entry_for(entry.key())) {
            debug!(key = entry.key(), line = idx, "updating active entry in place");
            self.lines[idx] = ConfigLine::Entry {
                key: entry.key().to_string(),
                value: entry.value().to_string(),
            };
            return UpsertOutcome::Updated;
        }

        if let Some(idx) = self
            .lines
            .iter()
            .position(|l| l.is_commented_entry_for(entry.key()))
        {
            debug!(key = entry.key(), line = idx, "uncommenting entry and setting value");
            self.lines[idx] = ConfigLine::Entry {
                key: entry.key().to_string(),
                value: entry.value().to_string(),
            };
            return UpsertOutcome::Uncommented;
        }

        debug!(key = entry.key(), "appending new entry");
        self.lines.push(ConfigLine::Entry {
            key: entry.key().to_string(),
            value: entry.value().to_string(),
        });
        self.trailing_newline = true;
        UpsertOutcome::Appended
    }

    /// Returns the value of the first active `key=` line, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|l| match l {
            ConfigLine::Entry { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Reports the state of `key` for diagnostics: active beats commented,
    /// first occurrence wins within each form.
    pub fn key_state(&self, key: &str) -> KeyState {
        if let Some(value) = self.get(key) {
            return KeyState::Set(value.to_string());
        }
        let commented = self.lines.iter().find_map(|l| match l {
            ConfigLine::CommentedEntry { key: k, value } if k == key => Some(value.clone()),
            _ => None,
        });
        match commented {
            Some(value) => KeyState::Commented(value),
            None => KeyState::Absent,
        }
    }

    /// Number of lines in the document.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// `true` if the document has no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, value: &str) -> ConfigEntry {
        ConfigEntry::new(key, value).expect("valid entry")
    }

    // ── ConfigEntry validation ────────────────────────────────────────────────

    #[test]
    fn test_entry_rejects_empty_key() {
        assert_eq!(ConfigEntry::new("", "1"), Err(EntryError::EmptyKey));
    }

    #[test]
    fn test_entry_rejects_key_with_equals() {
        let err = ConfigEntry::new("a=b", "1").unwrap_err();
        assert!(matches!(err, EntryError::InvalidKeyCharacter { found: '=', .. }));
    }

    #[test]
    fn test_entry_rejects_key_with_whitespace() {
        let err = ConfigEntry::new("gpu mem", "64").unwrap_err();
        assert!(matches!(err, EntryError::InvalidKeyCharacter { found: ' ', .. }));
    }

    #[test]
    fn test_entry_rejects_key_with_hash() {
        let err = ConfigEntry::new("#start_x", "1").unwrap_err();
        assert!(matches!(err, EntryError::InvalidKeyCharacter { found: '#', .. }));
    }

    #[test]
    fn test_entry_rejects_value_with_newline() {
        let err = ConfigEntry::new("start_x", "1\ngpu_mem=64").unwrap_err();
        assert!(matches!(err, EntryError::ValueContainsNewline { .. }));
    }

    #[test]
    fn test_entry_allows_empty_value() {
        let e = entry("initramfs", "");
        assert_eq!(e.to_string(), "initramfs=");
    }

    // ── Parse / render ────────────────────────────────────────────────────────

    #[test]
    fn test_parse_render_is_lossless() {
        let text = "# For more options see the docs\nstart_x=0\n\n#gpu_mem=64\narm_64bit=1\n";
        assert_eq!(BootConfigDocument::parse(text).render(), text);
    }

    #[test]
    fn test_parse_render_preserves_missing_trailing_newline() {
        let text = "start_x=0";
        assert_eq!(BootConfigDocument::parse(text).render(), text);
    }

    #[test]
    fn test_parse_render_preserves_lone_newline() {
        assert_eq!(BootConfigDocument::parse("\n").render(), "\n");
    }

    #[test]
    fn test_parse_empty_text_yields_empty_document() {
        let doc = BootConfigDocument::parse("");
        assert!(doc.is_empty());
        assert_eq!(doc.render(), "");
    }

    // ── Upsert: the three cases ───────────────────────────────────────────────

    #[test]
    fn test_upsert_updates_active_line_in_place() {
        let mut doc = BootConfigDocument::parse("start_x=0\ngpu_mem=64\n");
        let outcome = doc.upsert(&entry("start_x", "1"));
        assert_eq!(outcome, UpsertOutcome::Updated);
        assert_eq!(doc.render(), "start_x=1\ngpu_mem=64\n");
    }

    #[test]
    fn test_upsert_uncomments_commented_line() {
        let mut doc = BootConfigDocument::parse("#start_x=0\ngpu_mem=64\n");
        let outcome = doc.upsert(&entry("start_x", "1"));
        assert_eq!(outcome, UpsertOutcome::Uncommented);
        assert_eq!(doc.render(), "start_x=1\ngpu_mem=64\n");
    }

    #[test]
    fn test_upsert_appends_absent_key_as_final_line() {
        let mut doc = BootConfigDocument::parse("start_x=1\n");
        let outcome = doc.upsert(&entry("gpu_mem", "128"));
        assert_eq!(outcome, UpsertOutcome::Appended);
        assert_eq!(doc.render(), "start_x=1\ngpu_mem=128\n");
    }

    #[test]
    fn test_upsert_append_adds_trailing_newline_when_file_lacked_one() {
        let mut doc = BootConfigDocument::parse("start_x=1");
        let outcome = doc.upsert(&entry("gpu_mem", "128"));
        assert_eq!(outcome, UpsertOutcome::Appended);
        assert_eq!(doc.render(), "start_x=1\ngpu_mem=128\n");
    }

    #[test]
    fn test_upsert_into_empty_document_appends() {
        let mut doc = BootConfigDocument::parse("");
        assert_eq!(doc.upsert(&entry("start_x", "1")), UpsertOutcome::Appended);
        assert_eq!(doc.render(), "start_x=1\n");
    }

    #[test]
    fn test_upsert_active_line_wins_over_commented_line() {
        // Both forms present: the active line is updated, the commented one
        // is left alone (priority order, first rule wins).
        let mut doc = BootConfigDocument::parse("#start_x=0\nstart_x=0\n");
        let outcome = doc.upsert(&entry("start_x", "1"));
        assert_eq!(outcome, UpsertOutcome::Updated);
        assert_eq!(doc.render(), "#start_x=0\nstart_x=1\n");
    }

    // ── Idempotence ───────────────────────────────────────────────────────────

    #[test]
    fn test_upsert_twice_is_idempotent_and_reports_updated() {
        let mut doc = BootConfigDocument::parse("#gpu_mem=64\n");
        let e = entry("gpu_mem", "128");

        let first = doc.upsert(&e);
        let after_first = doc.render();
        let second = doc.upsert(&e);

        assert_eq!(first, UpsertOutcome::Uncommented);
        assert_eq!(second, UpsertOutcome::Updated);
        assert_eq!(doc.render(), after_first);
    }

    // ── Unrelated lines and invariants ────────────────────────────────────────

    #[test]
    fn test_upsert_never_touches_unrelated_lines() {
        let text = "foo=bar\n#baz=qux\n# plain comment\n\n";
        let mut doc = BootConfigDocument::parse(text);
        doc.upsert(&entry("gpu_mem", "128"));
        assert_eq!(doc.render(), format!("{text}gpu_mem=128\n"));
    }

    #[test]
    fn test_upsert_leaves_exactly_one_active_line_for_key() {
        let mut doc = BootConfigDocument::parse("#start_x=0\n");
        doc.upsert(&entry("start_x", "1"));

        let rendered = doc.render();
        let active = rendered
            .lines()
            .filter(|l| l.starts_with("start_x="))
            .count();
        let commented = rendered
            .lines()
            .filter(|l| l.starts_with("#start_x="))
            .count();
        assert_eq!(active, 1);
        assert_eq!(commented, 0);
    }

    #[test]
    fn test_upsert_with_duplicate_keys_corrects_first_only() {
        // Malformed input: documented policy is first match only.
        let mut doc = BootConfigDocument::parse("gpu_mem=64\ngpu_mem=32\n");
        let outcome = doc.upsert(&entry("gpu_mem", "128"));
        assert_eq!(outcome, UpsertOutcome::Updated);
        assert_eq!(doc.render(), "gpu_mem=128\ngpu_mem=32\n");
    }

    #[test]
    fn test_upsert_does_not_match_key_prefixes() {
        // "start_x" must not match "start_x2".
        let mut doc = BootConfigDocument::parse("start_x2=7\n");
        let outcome = doc.upsert(&entry("start_x", "1"));
        assert_eq!(outcome, UpsertOutcome::Appended);
        assert_eq!(doc.render(), "start_x2=7\nstart_x=1\n");
    }

    // ── Inspection API ────────────────────────────────────────────────────────

    #[test]
    fn test_get_returns_first_active_value() {
        let doc = BootConfigDocument::parse("gpu_mem=64\ngpu_mem=32\n");
        assert_eq!(doc.get("gpu_mem"), Some("64"));
        assert_eq!(doc.get("start_x"), None);
    }

    #[test]
    fn test_key_state_reports_all_three_states() {
        let doc = BootConfigDocument::parse("start_x=1\n#gpu_mem=64\n");
        assert_eq!(doc.key_state("start_x"), KeyState::Set("1".to_string()));
        assert_eq!(doc.key_state("gpu_mem"), KeyState::Commented("64".to_string()));
        assert_eq!(doc.key_state("camera_auto_detect"), KeyState::Absent);
    }
}
