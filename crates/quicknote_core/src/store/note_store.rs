//! In-memory note store with flat-file persistence.
//!
//! # Responsibility
//! - Own the ordered note collection and its positional mutations.
//! - Delegate the file format to `codec::line_codec`.
//!
//! # Invariants
//! - Insertion order is display order and persistence order.
//! - Positions are 1-based and shift down after a deletion.
//! - Failed operations leave the collection untouched.
//! - `load` replaces the collection; it never appends to it.
//! - `save` truncates and rewrites the whole file; it is not atomic.
//! - The shared count published through `NoteCountHandle` tracks `len()`.

use crate::codec::line_codec::{self, DecodeWarning};
use crate::model::note::{Note, FIELD_SEPARATOR};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Fixed notes file, resolved against the process working directory.
pub const DEFAULT_NOTES_FILE: &str = "notes.txt";

/// Static description of the save operation, printed once at startup.
pub const SAVE_OPERATION_DESCRIPTION: &str = "Saving notes to a file";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level failure for positional and file operations.
#[derive(Debug)]
pub enum StoreError {
    /// Position outside `[1, len]`.
    InvalidPosition { position: usize, len: usize },
    /// Reading or writing the notes file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPosition { position, len } => {
                write!(f, "invalid position {position}; expected 1..={len}")
            }
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPosition { .. } => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Reasons `NoteStore::add` refuses input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddError {
    /// Text is empty or whitespace-only.
    EmptyText,
    /// Text contains ` | ` and would not decode back after a save.
    ContainsSeparator,
    /// Text spans several lines and would not decode back after a save.
    ContainsLineBreak,
}

impl Display for AddError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "note text cannot be empty"),
            Self::ContainsSeparator => {
                write!(f, "note text cannot contain `{FIELD_SEPARATOR}`")
            }
            Self::ContainsLineBreak => write!(f, "note text must fit on one line"),
        }
    }
}

impl Error for AddError {}

/// Summary of one `NoteStore::load` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Notes now held by the store.
    pub loaded: usize,
    /// Lines skipped while decoding.
    pub warnings: Vec<DecodeWarning>,
    /// The file did not exist; the collection was left as it was.
    pub source_missing: bool,
}

/// Shared, lock-free view of the store size.
///
/// Readers on other threads get a best-effort snapshot; a slightly stale value
/// is acceptable.
#[derive(Debug, Clone, Default)]
pub struct NoteCountHandle {
    count: Arc<AtomicUsize>,
}

impl NoteCountHandle {
    pub fn get(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    fn set(&self, value: usize) {
        self.count.store(value, Ordering::Relaxed);
    }
}

/// `(position, note)` pairs in insertion order, positions starting at 1.
///
/// Clone the iterator to walk the same listing again.
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    inner: std::iter::Enumerate<std::slice::Iter<'a, Note>>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (usize, &'a Note);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(index, note)| (index + 1, note))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Entries<'_> {}

/// Listing result; `Empty` lets callers print a dedicated message.
#[derive(Debug, Clone)]
pub enum NoteListing<'a> {
    Empty,
    Entries(Entries<'a>),
}

/// Ordered in-memory note collection.
#[derive(Debug, Default)]
pub struct NoteStore {
    notes: Vec<Note>,
    count: NoteCountHandle,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Read-only view in insertion order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Returns a handle that follows the note count across mutations.
    pub fn count_handle(&self) -> NoteCountHandle {
        self.count.clone()
    }

    /// Trims and appends a note stamped with the current time.
    ///
    /// # Errors
    /// - `AddError::EmptyText` for blank input.
    /// - `AddError::ContainsSeparator` / `AddError::ContainsLineBreak` for text
    ///   the line format cannot carry.
    pub fn add(&mut self, text: &str) -> Result<&Note, AddError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AddError::EmptyText);
        }
        if trimmed.contains(FIELD_SEPARATOR) {
            return Err(AddError::ContainsSeparator);
        }
        if trimmed.contains(['\n', '\r']) {
            return Err(AddError::ContainsLineBreak);
        }

        self.notes.push(Note::new(trimmed));
        self.sync_count();
        info!(
            "event=note_add module=store status=ok count={}",
            self.notes.len()
        );
        Ok(&self.notes[self.notes.len() - 1])
    }

    /// Lists notes with 1-based positions.
    pub fn list(&self) -> NoteListing<'_> {
        if self.notes.is_empty() {
            return NoteListing::Empty;
        }
        NoteListing::Entries(Entries {
            inner: self.notes.iter().enumerate(),
        })
    }

    /// Removes the note at a 1-based position and returns it.
    ///
    /// # Errors
    /// - `StoreError::InvalidPosition` when `position` is outside `[1, len]`;
    ///   nothing is removed.
    pub fn delete_at(&mut self, position: usize) -> StoreResult<Note> {
        let len = self.notes.len();
        if position == 0 || position > len {
            return Err(StoreError::InvalidPosition { position, len });
        }

        let removed = self.notes.remove(position - 1);
        self.sync_count();
        info!(
            "event=note_delete module=store status=ok position={} count={}",
            position,
            self.notes.len()
        );
        Ok(removed)
    }

    /// Drops every in-memory note without touching the file.
    pub fn clear(&mut self) {
        self.notes.clear();
        self.sync_count();
    }

    /// Replaces the collection with notes decoded from `path`.
    ///
    /// A missing file is not an error: the collection is left unchanged and
    /// `LoadReport::source_missing` is set.
    /// Lines that are not valid UTF-8 are skipped with a warning like any other
    /// undecodable line.
    ///
    /// # Errors
    /// - `StoreError::Io` when the file exists but cannot be read.
    pub fn load(&mut self, path: impl AsRef<Path>) -> StoreResult<LoadReport> {
        let path = path.as_ref();
        let started_at = Instant::now();

        let contents = match std::fs::read(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("event=notes_load module=store status=missing");
                return Ok(LoadReport {
                    loaded: self.notes.len(),
                    warnings: Vec::new(),
                    source_missing: true,
                });
            }
            Err(err) => {
                error!(
                    "event=notes_load module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(io_error(path, err));
            }
        };

        let outcome = line_codec::decode_bytes(&contents);
        self.notes = outcome.notes;
        self.sync_count();

        info!(
            "event=notes_load module=store status=ok duration_ms={} notes={} skipped={}",
            started_at.elapsed().as_millis(),
            self.notes.len(),
            outcome.warnings.len()
        );
        Ok(LoadReport {
            loaded: self.notes.len(),
            warnings: outcome.warnings,
            source_missing: false,
        })
    }

    /// Writes every note to `path`, replacing previous contents.
    ///
    /// Returns the number of notes written.
    ///
    /// # Errors
    /// - `StoreError::Io` when the file cannot be written; prior on-disk
    ///   contents are then unspecified.
    pub fn save(&self, path: impl AsRef<Path>) -> StoreResult<usize> {
        let path = path.as_ref();
        let started_at = Instant::now();
        let contents = line_codec::encode_to_string(&self.notes);

        if let Err(err) = std::fs::write(path, contents) {
            error!(
                "event=notes_save module=store status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(io_error(path, err));
        }

        info!(
            "event=notes_save module=store status=ok duration_ms={} notes={}",
            started_at.elapsed().as_millis(),
            self.notes.len()
        );
        Ok(self.notes.len())
    }

    fn sync_count(&self) {
        self.count.set(self.notes.len());
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::{AddError, NoteListing, NoteStore, StoreError};

    #[test]
    fn add_trims_surrounding_whitespace() {
        let mut store = NoteStore::new();
        let note = store.add("  Buy milk \t").expect("add should succeed");
        assert_eq!(note.text(), "Buy milk");
    }

    #[test]
    fn add_rejects_text_the_file_format_cannot_carry() {
        let mut store = NoteStore::new();
        assert_eq!(store.add("a | b").unwrap_err(), AddError::ContainsSeparator);
        assert_eq!(store.add("a\nb").unwrap_err(), AddError::ContainsLineBreak);
        assert!(store.add("a|b").is_ok());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn list_signals_empty_store() {
        let store = NoteStore::new();
        assert!(matches!(store.list(), NoteListing::Empty));
    }

    #[test]
    fn list_entries_restart_from_a_clone() {
        let mut store = NoteStore::new();
        store.add("one").unwrap();
        store.add("two").unwrap();

        let NoteListing::Entries(entries) = store.list() else {
            panic!("expected entries");
        };
        assert_eq!(entries.len(), 2);
        let first_pass: Vec<usize> = entries.clone().map(|(position, _)| position).collect();
        let second_pass: Vec<&str> = entries.map(|(_, note)| note.text()).collect();
        assert_eq!(first_pass, vec![1, 2]);
        assert_eq!(second_pass, vec!["one", "two"]);
    }

    #[test]
    fn count_handle_tracks_mutations() {
        let mut store = NoteStore::new();
        let handle = store.count_handle();
        assert_eq!(handle.get(), 0);

        store.add("one").unwrap();
        store.add("two").unwrap();
        assert_eq!(handle.get(), 2);

        store.delete_at(1).unwrap();
        assert_eq!(handle.get(), 1);

        store.clear();
        assert_eq!(handle.get(), 0);
    }

    #[test]
    fn invalid_position_error_reports_range() {
        let mut store = NoteStore::new();
        store.add("only").unwrap();
        let err = store.delete_at(2).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidPosition {
                position: 2,
                len: 1
            }
        ));
        assert_eq!(err.to_string(), "invalid position 2; expected 1..=1");
    }
}
