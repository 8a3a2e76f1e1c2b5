//! Append-only response log.
//!
//! Every fetched response is appended as one record in the same framing the
//! [`RecordSplitter`](crate::core::RecordSplitter) reads back:
//! a `msgid=<id>:` line followed by the raw body.

use crate::core::{ClientError, ClientResult, SENTINEL_PREFIX};

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A response log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseLog {
    path: PathBuf,
}

impl ResponseLog {
    /// Creates a handle for the log at `path`. The file is opened per append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the log path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record, creating the file if needed.
    ///
    /// The body is terminated with a newline if it lacks one, so the next
    /// sentinel always starts on its own line.
    ///
    /// # Errors
    ///
    /// Returns `LogOpen` if the file cannot be opened and `LogWrite` if
    /// writing fails.
    pub fn append(&self, msg_id: &str, body: &[u8]) -> ClientResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(ClientError::LogOpen)?;

        let mut record = Vec::with_capacity(SENTINEL_PREFIX.len() + msg_id.len() + body.len() + 3);
        record.extend_from_slice(SENTINEL_PREFIX.as_bytes());
        record.extend_from_slice(msg_id.as_bytes());
        record.extend_from_slice(b":\n");
        record.extend_from_slice(body);
        if !body.ends_with(b"\n") {
            record.push(b'\n');
        }

        file.write_all(&record).map_err(ClientError::LogWrite)?;
        tracing::debug!(
            path = %self.path.display(),
            msg_id = %msg_id,
            bytes = body.len(),
            "Response logged"
        );
        Ok(())
    }
}
