//! Record Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A record parsing error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for record operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The metadata file could not be opened.
    #[display("unable to open metadata file: {}", _0.display())]
    Open(#[error(not(source))] PathBuf),
    /// The document is not valid comma-delimited UTF-8 text.
    #[display("malformed metadata document")]
    Malformed,
    /// Parsing a specific metadata file failed.
    #[display("unable to parse metadata file: {}", _0.display())]
    Document(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Opening can fail on transient I/O; a malformed document stays malformed.
        matches!(self, Self::Open(_))
    }
}
