//! Directory merging.
//!
//! Several export trees (one per archive, say) are combined into a single
//! destination tree with the same relative layout. Merging only ever adds
//! files: a same-named file already at the destination is kept as is, which
//! makes re-running a merge a no-op.

mod directory;
pub mod error;
mod file;
mod tree;

pub use self::directory::{merge_directory, target_directory};
pub use self::file::{Action, copy_file};
pub use self::tree::{MergeReport, merge};
