use crate::Context;
use crate::associate::directory::{Association, associate_directory};
use crate::associate::error::{ErrorKind, Result as AssociateResult};
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use exn::ResultExt;
use std::path::Path;
use tracing::instrument;

/// Everything an association run produced.
#[derive(Debug, Default)]
pub struct AssociationReport {
    /// In directory-traversal order, then metadata discovery order.
    pub associations: Vec<Association>,
    /// Number of directories (containing files) that were processed.
    pub directories: usize,
    pub diagnostics: Diagnostics,
}

/// Associates the metadata sidecars of every directory under `root`.
///
/// # Errors
/// Only an unreadable root fails the run, as
/// [`Exn<LibraryErrorKind::Associate>`](LibraryErrorKind::Associate). Every
/// other problem is recorded in [`AssociationReport::diagnostics`].
#[instrument(skip_all, fields(root = %root.as_ref().display()))]
pub fn associate(ctx: &Context, root: impl AsRef<Path>) -> LibraryResult<AssociationReport> {
    associate_inner(ctx, root.as_ref()).or_raise(|| LibraryErrorKind::Associate)
}

fn associate_inner(ctx: &Context, root: &Path) -> AssociateResult<AssociationReport> {
    tracing::info!(root = %root.display(), marker = %ctx.marker, "Parse photos with metadata");
    let mut report = AssociationReport::default();
    for listing in sidecar_walk::walk(root).or_raise(|| ErrorKind::Walk)? {
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
        if !listing.path.starts_with(root) {
            report.diagnostics.push(Diagnostic::OutsideRoot { path: listing.path, root: root.to_path_buf() });
            continue;
        }
        report.directories += 1;
        let associations = associate_directory(ctx, &listing, &mut report.diagnostics);
        report.associations.extend(associations);
    }
    tracing::info!(
        associations = report.associations.len(),
        directories = report.directories,
        diagnostics = report.diagnostics.len(),
        "Association complete"
    );
    Ok(report)
}
