use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::merge::file::{Action, copy_file};
use crate::merge::tree::MergeReport;
use sidecar_walk::DirectoryListing;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where the files of `listing` belong under `destination_root`, or `None` if
/// the listing isn't under `source_root` at all.
pub fn target_directory(listing: &Path, source_root: &Path, destination_root: &Path) -> Option<PathBuf> {
    let relative = listing.strip_prefix(source_root).ok()?;
    // Joining an empty path would append a trailing separator.
    if relative.as_os_str().is_empty() {
        return Some(destination_root.to_path_buf());
    }
    Some(destination_root.join(relative))
}

/// Copies every file of one source directory listing into its counterpart
/// under `destination_root`, creating that directory first if needed.
///
/// Files that already exist at the destination are left alone. Nothing here
/// fails the run: problems land in `report.diagnostics` and the affected file
/// (or the whole directory, if its destination can't be used) is skipped.
pub fn merge_directory(listing: &DirectoryListing, source_root: &Path, destination_root: &Path, report: &mut MergeReport) {
    let Some(target) = target_directory(&listing.path, source_root, destination_root) else {
        report.diagnostics.push(Diagnostic::OutsideRoot { path: listing.path.clone(), root: source_root.to_path_buf() });
        return;
    };
    if !prepare_target(&target, listing, &mut report.diagnostics) {
        return;
    }
    report.directories += 1;

    tracing::info!("Copying {} files: {} => {}", listing.files.len(), listing.path.display(), target.display());
    for name in &listing.files {
        let from = listing.file_path(name);
        match copy_file(&from, &target.join(name)) {
            Ok(Action::Copied(to)) => {
                tracing::trace!(from = %from.display(), to = %to.display(), "Copied file");
                report.copied += 1;
            },
            Ok(Action::AlreadyExists(to)) => {
                report.skipped += 1;
                report.diagnostics.push(Diagnostic::AlreadyExists { from, to });
            },
            Err(e) => {
                report.failed += 1;
                report.diagnostics.push(Diagnostic::CopyFailed {
                    to: target.join(name),
                    from,
                    reason: format!("{e:?}"),
                });
            },
        }
    }
}

/// Makes sure `target` is a usable directory. Returns `false` (after recording
/// why) if the listing has to be skipped.
fn prepare_target(target: &Path, listing: &DirectoryListing, diagnostics: &mut Diagnostics) -> bool {
    match fs::metadata(target) {
        Ok(metadata) if metadata.is_dir() => true,
        Ok(_) => {
            diagnostics.push(Diagnostic::NotADirectory { path: target.to_path_buf() });
            false
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!(
                "Creating path {} for copying {} files from {}",
                target.display(),
                listing.files.len(),
                listing.path.display()
            );
            match fs::create_dir_all(target) {
                Ok(()) => true,
                Err(e) => {
                    diagnostics.push(Diagnostic::CreateFailed { path: target.to_path_buf(), reason: e.to_string() });
                    false
                },
            }
        },
        Err(e) => {
            diagnostics.push(Diagnostic::CreateFailed { path: target.to_path_buf(), reason: e.to_string() });
            false
        },
    }
}
