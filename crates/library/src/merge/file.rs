use crate::merge::error::{ErrorKind, Result as MergeResult};
use exn::ResultExt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// The outcome of (successfully) merging a single file. Each variant carries
/// the destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The file was copied.
    Copied(PathBuf),
    /// A file with the same name was already at the destination; its
    /// contents were not compared and it was left untouched.
    AlreadyExists(PathBuf),
}

/// Copies `from` to `to`, unless `to` already exists.
///
/// The destination is created exclusively, so checking for an existing file
/// and claiming the name is a single step even if something else writes into
/// the destination at the same time. If the copy fails after the destination
/// was created, the partial file is removed.
///
/// Permission bits are copied from the source where possible.
pub fn copy_file(from: &Path, to: &Path) -> MergeResult<Action> {
    let mut output = match OpenOptions::new().write(true).create_new(true).open(to) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(Action::AlreadyExists(to.to_path_buf())),
        Err(e) => return Err(e).or_raise(|| ErrorKind::Create(to.to_path_buf())),
    };
    let copied = File::open(from).and_then(|mut input| {
        io::copy(&mut input, &mut output)?;
        output.flush()?;
        input.metadata()
    });
    match copied {
        Ok(metadata) => {
            // Contents are already in place; a file without the source's
            // permission bits is still a successful copy.
            _ = fs::set_permissions(to, metadata.permissions());
            Ok(Action::Copied(to.to_path_buf()))
        },
        Err(e) => {
            drop(output);
            _ = fs::remove_file(to);
            Err(e).or_raise(|| ErrorKind::Copy { from: from.to_path_buf(), to: to.to_path_buf() })
        },
    }
}
