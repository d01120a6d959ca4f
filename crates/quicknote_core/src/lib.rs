//! Core domain logic for QuickNote.
//! This crate is the single source of truth for note and file-format invariants.

pub mod codec;
pub mod logging;
pub mod model;
pub mod reminder;
pub mod store;

pub use codec::line_codec::{
    decode, decode_bytes, decode_str, encode, encode_to_string, DecodeOutcome, DecodeWarning,
    DecodeWarningKind,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, FIELD_SEPARATOR, TIMESTAMP_FORMAT};
pub use reminder::{spawn_reminder, ReminderHandle, ReminderOutcome, DEFAULT_REMINDER_DELAY};
pub use store::note_store::{
    AddError, Entries, LoadReport, NoteCountHandle, NoteListing, NoteStore, StoreError,
    StoreResult, DEFAULT_NOTES_FILE, SAVE_OPERATION_DESCRIPTION,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
