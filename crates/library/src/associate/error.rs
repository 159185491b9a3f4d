//! Error types for the [`associate`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.
//! Per-record problems are [`Diagnostic`](crate::Diagnostic)s, not errors:
//! only failures that stop the whole run end up here.

use derive_more::{Display, Error};

/// An association error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for association operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The source root could not be walked.
    #[display("unable to walk source directory")]
    Walk,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
