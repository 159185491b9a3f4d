//! Metadata-to-media association.
//!
//! Exports pair each media file with a metadata sidecar whose name is the
//! media name (or some prefix of it) followed by a marker such as
//! `.metadata.csv`. Which media file a sidecar describes is recovered from
//! names alone, per directory:
//!
//! 1. Files containing the marker are metadata candidates; their key is the
//!    name cut at the marker's last occurrence. Everything else is media.
//!    The first candidate to claim a key keeps it.
//! 2. A media file named exactly like the key is the match.
//! 3. Otherwise every media file starting with the key is a candidate. None
//!    means the sidecar is unresolved. With several, the shortest name wins,
//!    since derived copies (edits, resizes) append to the original's name.
//!
//! The entry point is [`associate`], which walks a whole tree and returns an
//! [`AssociationReport`]; [`associate_directory`] handles a single listing.

mod directory;
pub mod error;
mod resolve;
mod tree;

pub use self::directory::{Association, associate_directory};
pub use self::resolve::{Candidate, Partition, Resolution, derived_key, partition, resolve};
pub use self::tree::{AssociationReport, associate};
