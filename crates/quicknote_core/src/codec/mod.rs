//! Persistence codec between notes and text lines.
//!
//! # Responsibility
//! - Own the flat-file line format; no other module splits or joins lines.
//!
//! # See also
//! - crate::store for file I/O around the codec.

pub mod line_codec;
