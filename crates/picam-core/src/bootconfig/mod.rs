//! Boot-configuration parsing and mutation.
//!
//! `line` holds the per-line classification; `document` holds the whole-file
//! buffer and the upsert algorithm.

pub mod document;
pub mod line;
