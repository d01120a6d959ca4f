//! Note domain model.
//!
//! # Responsibility
//! - Define the immutable value stored for every user-authored note.
//! - Own the single-line rendering shared by display and persistence.
//!
//! # Invariants
//! - `created_at` carries whole-second precision only.
//! - Equality and hashing consider `text` alone; two notes with the same text
//!   are the same note for lookup purposes even when timestamps differ.
//!
//! # See also
//! - crate::codec for the reverse direction of `Note::format`.

use chrono::{Local, NaiveDateTime, Timelike};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// `chrono` pattern for the persisted timestamp (`YYYY-MM-DD HH:MM:SS`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Literal separator between note text and timestamp.
pub const FIELD_SEPARATOR: &str = " | ";

/// One note: free text plus local creation time.
#[derive(Debug, Clone)]
pub struct Note {
    text: String,
    created_at: NaiveDateTime,
}

impl Note {
    /// Creates a note stamped with the current local time.
    ///
    /// Blank-text rejection is the caller's job (see `NoteStore::add`).
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_created_at(text, Local::now().naive_local())
    }

    /// Creates a note with an externally supplied timestamp.
    ///
    /// Used by the codec when rebuilding notes from persisted lines.
    pub fn with_created_at(text: impl Into<String>, created_at: NaiveDateTime) -> Self {
        Self {
            text: text.into(),
            created_at: truncate_to_seconds(created_at),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// Renders `<text> | <YYYY-MM-DD HH:MM:SS>`, which is also the persisted line.
    pub fn format(&self) -> String {
        format!(
            "{}{}{}",
            self.text,
            FIELD_SEPARATOR,
            self.created_at.format(TIMESTAMP_FORMAT)
        )
    }
}

impl Display for Note {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Note {}

impl Hash for Note {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

fn truncate_to_seconds(value: NaiveDateTime) -> NaiveDateTime {
    value.with_nanosecond(0).unwrap_or(value)
}
