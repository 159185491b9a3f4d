use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::merge::directory::merge_directory;
use crate::merge::error::{ErrorKind, Result as MergeResult};
use exn::ResultExt;
use std::fs;
use std::path::Path;
use tracing::instrument;

/// Totals and diagnostics of a merge run.
#[derive(Debug, Default)]
pub struct MergeReport {
    /// Source directories whose files were considered for copying.
    pub directories: usize,
    pub copied: usize,
    /// Files left alone because a same-named destination file existed.
    pub skipped: usize,
    pub failed: usize,
    pub diagnostics: Diagnostics,
}

/// Merges every source tree into `destination`, in order.
///
/// The destination root is created if needed. Every source root is opened
/// before anything is copied, so a missing source aborts the run without
/// partially merging the others. When the destination is nested within a
/// source, the directories under the destination are never merged. A source
/// that is itself inside the destination is merged as usual.
///
/// # Errors
/// Returns [`Exn<LibraryErrorKind::Merge>`](LibraryErrorKind::Merge) if a
/// source root can't be read or the destination root can't be created. Every
/// other problem is recorded in [`MergeReport::diagnostics`].
#[instrument(skip_all, fields(destination = %destination.as_ref().display(), sources = sources.len()))]
pub fn merge<S: AsRef<Path>>(sources: &[S], destination: impl AsRef<Path>) -> LibraryResult<MergeReport> {
    merge_inner(sources, destination.as_ref()).or_raise(|| LibraryErrorKind::Merge)
}

fn merge_inner<S: AsRef<Path>>(sources: &[S], destination: &Path) -> MergeResult<MergeReport> {
    let walks = sources
        .iter()
        .map(|source| {
            let source = source.as_ref();
            sidecar_walk::walk(source).or_raise(|| ErrorKind::Walk(source.to_path_buf()))
        })
        .collect::<MergeResult<Vec<_>>>()?;

    fs::create_dir_all(destination).or_raise(|| ErrorKind::Destination(destination.to_path_buf()))?;
    let guard = fs::canonicalize(destination).or_raise(|| ErrorKind::Destination(destination.to_path_buf()))?;

    let mut report = MergeReport::default();
    for walk in walks {
        let root = walk.root().to_path_buf();
        tracing::info!(source = %root.display(), "Merging source tree");
        // Everything in a source under the destination lies under the guard too.
        let guarded = !is_within(&root, &guard);
        for listing in walk {
            let listing = match listing {
                Ok(l) => l,
                Err(e) => {
                    report.diagnostics.push(Diagnostic::UnreadableDirectory {
                        path: e.path().to_path_buf(),
                        reason: (*e).to_string(),
                    });
                    continue;
                },
            };
            if guarded && is_within(&listing.path, &guard) {
                tracing::debug!(path = %listing.path.display(), "Skipping directory inside destination");
                continue;
            }
            merge_directory(&listing, &root, destination, &mut report);
        }
    }
    tracing::info!(
        directories = report.directories,
        copied = report.copied,
        skipped = report.skipped,
        failed = report.failed,
        "Merge complete"
    );
    Ok(report)
}

fn is_within(path: &Path, canonical_root: &Path) -> bool {
    fs::canonicalize(path).is_ok_and(|p| p.starts_with(canonical_root))
}
