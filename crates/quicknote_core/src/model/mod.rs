//! Domain model for quick notes.
//!
//! # Responsibility
//! - Define the value types shared by codec, store and CLI.
//!
//! # Invariants
//! - Notes are immutable once constructed.

pub mod note;
