//! Line-oriented note codec.
//!
//! # Responsibility
//! - Encode notes into one `<text> | <YYYY-MM-DD HH:MM:SS>` line each.
//! - Decode persisted lines back into notes, skipping lines that do not parse.
//!
//! # Invariants
//! - Output order always equals input order, in both directions.
//! - A bad line never aborts decoding; it yields exactly one warning and no note.
//! - Note text is never written to logs, only line numbers and reasons.

use crate::model::note::{Note, FIELD_SEPARATOR, TIMESTAMP_FORMAT};
use chrono::{NaiveDateTime, Timelike};
use log::{debug, warn};
use std::fmt::{Display, Formatter};

#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

const TIMESTAMP_LEN: usize = 19;

/// Why a persisted line was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeWarningKind {
    /// Splitting on ` | ` did not yield exactly two parts.
    MalformedLine,
    /// The second part is not a `YYYY-MM-DD HH:MM:SS` timestamp.
    UnparsableTimestamp,
    /// The raw line is not valid UTF-8.
    InvalidEncoding,
}

impl DecodeWarningKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedLine => "malformed line format",
            Self::UnparsableTimestamp => "unparsable timestamp",
            Self::InvalidEncoding => "invalid UTF-8",
        }
    }

    fn event_reason(self) -> &'static str {
        match self {
            Self::MalformedLine => "malformed_line",
            Self::UnparsableTimestamp => "unparsable_timestamp",
            Self::InvalidEncoding => "invalid_encoding",
        }
    }
}

/// One skipped line, reported to the caller instead of failing the decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeWarning {
    /// 1-based line number within the decoded input.
    pub line_number: usize,
    /// Raw line content as read; invalid UTF-8 is replaced lossily.
    pub line: String,
    pub kind: DecodeWarningKind,
}

impl Display for DecodeWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: {} in `{}`, skipped",
            self.line_number,
            self.kind.as_str(),
            self.line
        )
    }
}

/// Result of decoding a sequence of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeOutcome {
    /// Successfully decoded notes in line order.
    pub notes: Vec<Note>,
    /// One entry per skipped line, in line order.
    pub warnings: Vec<DecodeWarning>,
}

/// Renders every note with `Note::format`, preserving order.
pub fn encode(notes: &[Note]) -> Vec<String> {
    notes.iter().map(Note::format).collect()
}

/// Renders notes as file contents; every line ends with the platform terminator.
pub fn encode_to_string(notes: &[Note]) -> String {
    let mut contents = String::new();
    for line in encode(notes) {
        contents.push_str(&line);
        contents.push_str(LINE_ENDING);
    }
    contents
}

/// Decodes persisted lines, degrading per line.
pub fn decode<'a, I>(lines: I) -> DecodeOutcome
where
    I: IntoIterator<Item = &'a str>,
{
    let mut outcome = DecodeOutcome::default();
    for (index, line) in lines.into_iter().enumerate() {
        outcome.record(index + 1, decode_line(line), || line.to_string());
    }
    outcome.finish()
}

/// Decodes whole file contents; accepts `\n` and `\r\n` terminators.
pub fn decode_str(contents: &str) -> DecodeOutcome {
    decode(contents.lines())
}

/// Decodes raw file bytes line by line.
///
/// A line that is not valid UTF-8 becomes an `InvalidEncoding` warning; the
/// remaining lines still decode. Terminators follow `str::lines`.
pub fn decode_bytes(contents: &[u8]) -> DecodeOutcome {
    let mut outcome = DecodeOutcome::default();
    for (index, raw) in contents.split_inclusive(|byte| *byte == b'\n').enumerate() {
        let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let result = std::str::from_utf8(raw)
            .map_err(|_| DecodeWarningKind::InvalidEncoding)
            .and_then(decode_line);
        outcome.record(index + 1, result, || {
            String::from_utf8_lossy(raw).into_owned()
        });
    }
    outcome.finish()
}

impl DecodeOutcome {
    fn record<F>(&mut self, line_number: usize, result: Result<Note, DecodeWarningKind>, line: F)
    where
        F: FnOnce() -> String,
    {
        match result {
            Ok(note) => self.notes.push(note),
            Err(kind) => {
                warn!(
                    "event=note_decode module=codec status=skipped line={} reason={}",
                    line_number,
                    kind.event_reason()
                );
                self.warnings.push(DecodeWarning {
                    line_number,
                    line: line(),
                    kind,
                });
            }
        }
    }

    fn finish(self) -> Self {
        debug!(
            "event=note_decode module=codec status=ok notes={} warnings={}",
            self.notes.len(),
            self.warnings.len()
        );
        self
    }
}

fn decode_line(line: &str) -> Result<Note, DecodeWarningKind> {
    let parts: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    let [text, timestamp] = parts.as_slice() else {
        return Err(DecodeWarningKind::MalformedLine);
    };

    let created_at =
        parse_timestamp(timestamp).ok_or(DecodeWarningKind::UnparsableTimestamp)?;
    Ok(Note::with_created_at(*text, created_at))
}

/// Parses the exact `YYYY-MM-DD HH:MM:SS` shape.
///
/// `chrono` alone tolerates single-digit fields and padding, so the shape is
/// checked byte-by-byte first. A `60` seconds field parses as a leap second
/// (nanoseconds >= 1e9) and is rejected.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if !has_timestamp_shape(value) {
        return None;
    }
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .ok()
        .filter(|parsed| parsed.nanosecond() < 1_000_000_000)
}

fn has_timestamp_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != TIMESTAMP_LEN {
        return false;
    }
    bytes.iter().enumerate().all(|(index, byte)| match index {
        4 | 7 => *byte == b'-',
        10 => *byte == b' ',
        13 | 16 => *byte == b':',
        _ => byte.is_ascii_digit(),
    })
}
