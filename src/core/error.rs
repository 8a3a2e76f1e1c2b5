//! Error types for the varist-ha library.
//!
//! Two families exist: [`ReportError`] for the response-processing core and
//! [`ClientError`] for the analyzer collaborator. The library never panics;
//! all errors are returned as `Result` values.

use thiserror::Error;

/// The error type for response processing.
///
/// Only [`ReportError::Io`] is fatal to a run. [`ReportError::Decode`] is
/// raised per record and turned into a failure verdict by the processor.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Reading the input stream or writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record body is not a well-shaped scan document.
    #[error("failed to decode scan document: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ReportError {
    /// Returns `true` if this error must stop the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Returns the short reason used in failure verdicts.
    pub fn verdict_reason(&self) -> &'static str {
        match self {
            Self::Io(_) => "ReadError",
            Self::Decode(_) => "ParseError",
        }
    }
}

/// Error type for the analyzer client and its surrounding I/O.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configuration file is missing, unreadable, or incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// The HTTP request could not be completed.
    #[error("request to analyzer failed: {message}")]
    ConnectionFailed {
        /// Error message describing the failure.
        message: String,
    },

    /// The analyzer answered with a non-success status.
    #[error("analyzer returned HTTP {status}")]
    HttpStatus {
        /// Status line as reported by the server, e.g. `503 Service Unavailable`.
        status: String,
    },

    /// Reading the response body failed.
    #[error("failed to read analyzer response: {message}")]
    ReadFailed {
        /// Error message describing the failure.
        message: String,
    },

    /// Opening the response log failed.
    #[error("failed to open response log: {0}")]
    LogOpen(#[source] std::io::Error),

    /// Writing to the response log failed.
    #[error("failed to write response log: {0}")]
    LogWrite(#[source] std::io::Error),
}

impl ClientError {
    /// Creates a `Configuration` error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a `ConnectionFailed` error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            message: message.into(),
        }
    }

    /// Creates a `ReadFailed` error.
    pub fn read_failed(message: impl Into<String>) -> Self {
        Self::ReadFailed {
            message: message.into(),
        }
    }

    /// Returns the `Result=` value reported to the mail filter for this error.
    pub fn verdict_reason(&self) -> String {
        match self {
            Self::Configuration { .. } => "ConfigLoadError".to_string(),
            Self::ConnectionFailed { message } => {
                format!("HTTPRequestError:{}", sanitize(message))
            }
            Self::HttpStatus { status } => format!("HTTPStatus:{}", status),
            Self::ReadFailed { .. } => "ReadError".to_string(),
            Self::LogOpen(_) => "LogOpenError".to_string(),
            Self::LogWrite(_) => "LogWriteError".to_string(),
        }
    }
}

/// Replaces line breaks so a message stays on one verdict line.
pub fn sanitize(message: &str) -> String {
    message.replace(['\r', '\n'], " ")
}

/// A specialized `Result` type for response processing.
pub type ReportResult<T> = Result<T, ReportError>;

/// A specialized `Result` type for analyzer client operations.
pub type ClientResult<T> = Result<T, ClientError>;
