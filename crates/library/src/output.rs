use crate::associate::Association;
use crate::error::{ErrorKind, Result as LibraryResult};
use exn::ResultExt;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes the association document to `path` as a JSON array of
/// `[identifier, media, record]` triples.
///
/// The document is written to a temporary file next to `path` and then
/// renamed over it, so `path` is either left as it was or fully replaced.
pub fn write_associations(path: impl AsRef<Path>, associations: &[Association], pretty: bool) -> LibraryResult<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file = NamedTempFile::new_in(parent).or_raise(|| ErrorKind::Output(path.to_path_buf()))?;
    let mut writer = BufWriter::new(file);
    let serialized = match pretty {
        true => serde_json::to_writer_pretty(&mut writer, associations),
        false => serde_json::to_writer(&mut writer, associations),
    };
    serialized.or_raise(|| ErrorKind::Output(path.to_path_buf()))?;
    writer.write_all(b"\n").or_raise(|| ErrorKind::Output(path.to_path_buf()))?;
    let file = writer.into_inner().map_err(|e| e.into_error()).or_raise(|| ErrorKind::Output(path.to_path_buf()))?;

    // Temporary files are created owner-only.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        _ = file.as_file().set_permissions(std::fs::Permissions::from_mode(0o644));
    }
    file.as_file().sync_all().or_raise(|| ErrorKind::Output(path.to_path_buf()))?;
    file.persist(path).map_err(|e| e.error).or_raise(|| ErrorKind::Output(path.to_path_buf()))?;
    tracing::debug!(path = %path.display(), associations = associations.len(), "Wrote association document");
    Ok(())
}
