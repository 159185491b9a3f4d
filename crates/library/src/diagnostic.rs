//! Recoverable, per-item problems.
//!
//! Neither engine stops for a single bad file or directory. Each problem is
//! described by a [`Diagnostic`], recorded in the [`Diagnostics`] sink owned
//! by the engine's report, and logged at its [`Severity`] the moment it is
//! recorded.

use derive_more::Display;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A directory below the walk root could not be read; its subtree is skipped.
    #[display("Unable to read directory {}: {reason}", path.display())]
    UnreadableDirectory { path: PathBuf, reason: String },
    /// A listed directory does not lie under the root being processed.
    #[display("Subdir {} should begin with {}", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },
    /// File name is not valid UTF-8 and cannot take part in name matching.
    #[display("Ignoring non-UTF-8 file name {name:?} in {}", directory.display())]
    NonUtf8Name { directory: PathBuf, name: OsString },
    /// Directory path is not valid UTF-8; none of its files can be associated.
    #[display("Ignoring directory with non-UTF-8 path {}", path.display())]
    NonUtf8Directory { path: PathBuf },
    /// A second metadata file derived a key already claimed in the directory.
    #[display("Prefix already exists: {key} (ignoring {})", metadata.display())]
    DuplicateKey { metadata: PathBuf, key: String },
    /// No media file starts with the metadata file's key.
    #[display("Unable to find corresponding photo {key} for metadata {}", metadata.display())]
    Unresolved { metadata: PathBuf, key: String },
    /// Several media files start with the key; the shortest one was picked.
    #[display("More than one corresponding photos {candidates:?} for metadata {}. Guess {chosen}", metadata.display())]
    Ambiguous { metadata: PathBuf, candidates: Vec<String>, chosen: String },
    /// The metadata document has a header but no data rows.
    #[display("Expect single row in metadata: {}, actual: 0", metadata.display())]
    EmptyRecord { metadata: PathBuf },
    /// The metadata document has more than one data row.
    #[display("Expect single row in metadata: {}, actual: {rows}{}", metadata.display(), if *kept { " (keeping first)" } else { " (rejected)" })]
    MultipleRows { metadata: PathBuf, rows: usize, kept: bool },
    /// The metadata document could not be opened or parsed.
    #[display("Unable to read metadata {}: {reason}", metadata.display())]
    UnreadableRecord { metadata: PathBuf, reason: String },
    /// The record has no identifier field.
    #[display("Metadata {} has no `{}` field", metadata.display(), sidecar_record::IDENTIFIER_FIELD)]
    MissingIdentifier { metadata: PathBuf },
    /// Destination path exists, but isn't a directory; the whole source directory is skipped.
    #[display("Expect {} a directory, which is not", path.display())]
    NotADirectory { path: PathBuf },
    /// Destination directory could not be created; the whole source directory is skipped.
    #[display("Unable to create directory {}: {reason}", path.display())]
    CreateFailed { path: PathBuf, reason: String },
    /// A same-named destination file already exists, so nothing was copied.
    #[display("Skip copying {} to {}: file exists", from.display(), to.display())]
    AlreadyExists { from: PathBuf, to: PathBuf },
    /// Copying a single file failed; no partial file was left behind.
    #[display("Unable to copy {} to {}: {reason}", from.display(), to.display())]
    CopyFailed { from: PathBuf, to: PathBuf, reason: String },
}
impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Self::Ambiguous { .. } => Severity::Info,
            Self::UnreadableDirectory { .. }
            | Self::NonUtf8Name { .. }
            | Self::NonUtf8Directory { .. }
            | Self::DuplicateKey { .. }
            | Self::Unresolved { .. }
            | Self::EmptyRecord { .. }
            | Self::MultipleRows { .. }
            | Self::MissingIdentifier { .. }
            | Self::AlreadyExists { .. } => Severity::Warning,
            Self::OutsideRoot { .. }
            | Self::UnreadableRecord { .. }
            | Self::NotADirectory { .. }
            | Self::CreateFailed { .. }
            | Self::CopyFailed { .. } => Severity::Error,
        }
    }

    fn emit(&self) {
        match self.severity() {
            Severity::Info => tracing::info!("{self}"),
            Severity::Warning => tracing::warn!("{self}"),
            Severity::Error => tracing::error!("{self}"),
        }
    }
}

/// Collects the [`Diagnostic`]s produced during one engine run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}
impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs the diagnostic, then keeps it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        diagnostic.emit();
        self.entries.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded diagnostics at or above `severity`.
    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|d| d.severity() >= severity).count()
    }
}
impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
