//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Each engine raises its own
//! [`associate::error`](crate::associate::error) or
//! [`merge::error`](crate::merge::error) kinds internally, wrapped in one of
//! these at the public boundary.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("metadata association failed")]
    Associate,
    #[display("directory merge failed")]
    Merge,
    #[display("unable to write association document: {}", _0.display())]
    Output(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Output(_))
    }
}
