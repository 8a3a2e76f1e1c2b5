//! Record splitting for response logs.
//!
//! A response log is unframed: each record is a `msgid=<id>:` sentinel line
//! followed by the JSON body lines of that record. No brace matching is done,
//! so a body line that itself starts with `msgid=` would be taken as the
//! start of a new record. That is a constraint of the log format.

use crate::core::error::ReportResult;

use std::borrow::Cow;
use std::io::{BufRead, Split};

/// Prefix that marks the first line of a record.
pub const SENTINEL_PREFIX: &str = "msgid=";

/// One identifier plus raw JSON body extracted from a response log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Message identifier from the sentinel line.
    pub identifier: String,

    /// Body lines concatenated without separators.
    pub raw_body: String,
}

impl Record {
    /// Creates a record from an identifier and a body.
    pub fn new(identifier: impl Into<String>, raw_body: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            raw_body: raw_body.into(),
        }
    }
}

/// Returns the identifier if `line` is a sentinel line.
///
/// The identifier is everything after `msgid=`, minus one trailing `:`.
pub fn parse_sentinel(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(SENTINEL_PREFIX)?;
    Some(rest.strip_suffix(':').unwrap_or(rest))
}

/// Decodes one raw line, dropping a trailing `\r`.
///
/// Invalid UTF-8 is replaced rather than rejected; the JSON decoder sees the
/// replacement characters.
fn decode_line(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes)
}

#[derive(Debug)]
struct PendingRecord {
    identifier: String,
    body: String,
    body_lines: usize,
}

impl PendingRecord {
    fn new(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            body: String::new(),
            body_lines: 0,
        }
    }

    fn push_line(&mut self, line: &str) {
        self.body.push_str(line);
        self.body_lines += 1;
    }

    fn into_record(self) -> Record {
        Record {
            identifier: self.identifier,
            raw_body: self.body,
        }
    }
}

/// Iterator that groups the lines of a response log into [`Record`]s.
///
/// A record is flushed when the next sentinel line arrives, or at end of
/// stream if at least one body line was read for it. Lines before the first
/// sentinel are discarded. The first read error is yielded once and ends the
/// iteration; records already yielded are unaffected.
///
/// # Example
///
/// ```rust
/// use varist_ha::core::RecordSplitter;
///
/// let log = "msgid=1:\n{}\nmsgid=2:\n{\"FileName\":\n\"a.eml\"}\n";
/// let records: Vec<_> = RecordSplitter::new(log.as_bytes())
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].identifier, "2");
/// assert_eq!(records[1].raw_body, "{\"FileName\":\"a.eml\"}");
/// ```
#[derive(Debug)]
pub struct RecordSplitter<R> {
    lines: Split<R>,
    pending: Option<PendingRecord>,
    finished: bool,
}

impl<R: BufRead> RecordSplitter<R> {
    /// Creates a splitter over a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.split(b'\n'),
            pending: None,
            finished: false,
        }
    }
}

impl<R: BufRead> Iterator for RecordSplitter<R> {
    type Item = ReportResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.lines.next() {
                Some(Ok(bytes)) => {
                    let line = decode_line(&bytes);
                    if let Some(identifier) = parse_sentinel(&line) {
                        let next = PendingRecord::new(identifier);
                        if let Some(previous) = self.pending.replace(next) {
                            return Some(Ok(previous.into_record()));
                        }
                    } else if let Some(pending) = self.pending.as_mut() {
                        pending.push_line(&line);
                    }
                }
                Some(Err(e)) => {
                    self.finished = true;
                    self.pending = None;
                    return Some(Err(e.into()));
                }
                None => {
                    self.finished = true;
                    // A trailing sentinel with no body is not a record.
                    return self
                        .pending
                        .take()
                        .filter(|pending| pending.body_lines > 0)
                        .map(|pending| Ok(pending.into_record()));
                }
            }
        }
    }
}
