//! Error types for the [`merge`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A merge error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for merge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a merge failure.
///
/// ### Fatal Errors
/// - [`ErrorKind::Walk`]
/// - [`ErrorKind::Destination`]
///
/// ### Per-file Errors
/// - [`ErrorKind::Create`]
/// - [`ErrorKind::Copy`]
///
/// Per-file errors never escape [`merge`](super::merge); they are turned into
/// [`Diagnostic`](crate::Diagnostic)s.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A source root could not be walked.
    #[display("unable to walk source directory: {}", _0.display())]
    Walk(#[error(not(source))] PathBuf),
    /// The destination root could not be created.
    #[display("unable to prepare destination: {}", _0.display())]
    Destination(#[error(not(source))] PathBuf),
    /// The destination file could not be created.
    #[display("unable to create {}", _0.display())]
    Create(#[error(not(source))] PathBuf),
    /// Reading the source or writing the destination failed midway.
    #[display("unable to copy {} to {}", from.display(), to.display())]
    Copy { from: PathBuf, to: PathBuf },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Create(_) | Self::Copy { .. })
    }
}
