//! Per-directory traversal of export trees.
//!
//! [`walk`] yields one [`DirectoryListing`] for every directory under (and
//! including) a root that directly contains at least one file. Directories
//! that only hold other directories are never yielded.
//!
//! The walk is pre-order, siblings in ascending name order, and file names
//! inside a listing are sorted too. For a fixed filesystem state the sequence
//! is therefore fully deterministic, which keeps anything built on top of it
//! reproducible between runs.
//!
//! Only the root is allowed to fail the walk. An unreadable subdirectory is
//! yielded as an `Err` item and the walk carries on with its siblings.

pub mod error;

use crate::error::{ErrorKind, Result};
use std::ffi::{OsStr, OsString};
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};

/// The files found directly inside one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    /// Directory path, as reached from the walk root (root joined with
    /// relative components, never canonicalized).
    pub path: PathBuf,
    /// Names of the files directly inside [`path`](Self::path), sorted.
    pub files: Vec<OsString>,
}
impl DirectoryListing {
    /// Full path of one of the listed files.
    pub fn file_path(&self, name: impl AsRef<OsStr>) -> PathBuf {
        self.path.join(name.as_ref())
    }

    /// Splits the listed file names into those that are valid UTF-8 and
    /// those that are not.
    pub fn utf8_files(&self) -> (Vec<&str>, Vec<&OsStr>) {
        let mut valid = Vec::with_capacity(self.files.len());
        let mut invalid = Vec::new();
        for name in &self.files {
            match name.to_str() {
                Some(s) => valid.push(s),
                None => invalid.push(name.as_os_str()),
            }
        }
        (valid, invalid)
    }
}

enum WalkEntry {
    File(OsString),
    Descend(PathBuf),
    Skip,
}

/// Lazy iterator over the [`DirectoryListing`]s of a tree. Created by [`walk`].
pub struct Walk {
    root: PathBuf,
    ready: Option<DirectoryListing>,
    stack: Vec<PathBuf>,
}
impl Walk {
    /// The root this walk started from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
impl Iterator for Walk {
    type Item = Result<DirectoryListing>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(listing) = self.ready.take()
            && !listing.files.is_empty()
        {
            return Some(Ok(listing));
        }
        while let Some(current) = self.stack.pop() {
            match read_directory(&current) {
                Ok((listing, subdirs)) => {
                    // Reversed so the smallest name is popped first.
                    self.stack.extend(subdirs.into_iter().rev());
                    if !listing.files.is_empty() {
                        return Some(Ok(listing));
                    }
                },
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

/// Starts walking the tree under `root`.
///
/// The root directory is read eagerly so that an unreadable, missing, or
/// non-directory root fails here instead of surfacing as the first item.
///
/// ```no_run
/// for listing in sidecar_walk::walk("/exports/takeout")? {
///     let listing = listing?;
///     println!("{}: {} files", listing.path.display(), listing.files.len());
/// }
/// # Ok::<(), sidecar_walk::error::Error>(())
/// ```
pub fn walk(root: impl AsRef<Path>) -> Result<Walk> {
    let root = root.as_ref().to_path_buf();
    let (listing, mut subdirs) = read_directory(&root)?;
    subdirs.reverse();
    Ok(Walk { root, ready: Some(listing), stack: subdirs })
}

/// Reads a single directory, returning its listing and its (sorted)
/// subdirectories.
fn read_directory(dir: &Path) -> Result<(DirectoryListing, Vec<PathBuf>)> {
    let entries = fs::read_dir(dir).map_err(|e| ErrorKind::from_io(e, dir))?;
    let mut files = Vec::new();
    let mut subdirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ErrorKind::from_io(e, dir))?;
        match classify(&entry) {
            WalkEntry::File(name) => files.push(name),
            WalkEntry::Descend(path) => subdirs.push(path),
            WalkEntry::Skip => {},
        }
    }
    files.sort();
    subdirs.sort();
    tracing::trace!(path = %dir.display(), files = files.len(), subdirs = subdirs.len(), "Read directory");
    Ok((DirectoryListing { path: dir.to_path_buf(), files }, subdirs))
}

fn classify(entry: &DirEntry) -> WalkEntry {
    let path = entry.path();
    let Ok(file_type) = entry.file_type() else {
        tracing::trace!(path = %path.display(), "Unable to determine entry type; skipping");
        return WalkEntry::Skip;
    };
    if file_type.is_dir() {
        return WalkEntry::Descend(path);
    }
    if file_type.is_file() {
        return WalkEntry::File(entry.file_name());
    }
    if file_type.is_symlink() {
        // Symlinked directories are not followed, symlinked files are listed.
        return match fs::metadata(&path) {
            Ok(target) if target.is_file() => WalkEntry::File(entry.file_name()),
            Ok(_) => WalkEntry::Skip,
            Err(_) => {
                tracing::trace!(path = %path.display(), "Dropping broken symlink");
                WalkEntry::Skip
            },
        };
    }
    WalkEntry::Skip
}
