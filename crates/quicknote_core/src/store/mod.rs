//! Note store: ordered collection plus load/save orchestration.
//!
//! # Responsibility
//! - Keep positional mutation rules in one place.
//! - Isolate file I/O from the codec and from the CLI.

pub mod note_store;
