use crate::Context;
use crate::associate::resolve::{Resolution, partition, resolve};
use crate::diagnostic::{Diagnostic, Diagnostics};
use serde::ser::{Serialize, Serializer};
use sidecar_record::{MetadataRecord, RowPolicy};
use sidecar_walk::DirectoryListing;
use std::path::Path;

/// One metadata record, resolved to the media file it describes.
///
/// Serializes as the 3-element array `[identifier, media, record]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    /// The record's identifier (`url`) field.
    pub identifier: String,
    /// Path of the matched media file.
    pub media: String,
    pub record: MetadataRecord,
}
impl Serialize for Association {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.identifier, &self.media, &self.record).serialize(serializer)
    }
}

/// Resolves every metadata sidecar in one directory listing to a media file.
///
/// Associations are returned in the order their metadata files were
/// enumerated. Anything that prevents a record from being associated (no
/// match, duplicate key, unreadable or empty document, missing identifier)
/// is recorded in `diagnostics` and the record is skipped. A directory whose
/// own path isn't valid UTF-8 is skipped as a whole.
pub fn associate_directory(ctx: &Context, listing: &DirectoryListing, diagnostics: &mut Diagnostics) -> Vec<Association> {
    let Some(directory) = listing.path.to_str() else {
        diagnostics.push(Diagnostic::NonUtf8Directory { path: listing.path.clone() });
        return Vec::new();
    };
    let (files, invalid) = listing.utf8_files();
    for name in invalid {
        diagnostics.push(Diagnostic::NonUtf8Name { directory: listing.path.clone(), name: name.to_os_string() });
    }

    let partition = partition(files, &ctx.marker);
    for duplicate in &partition.duplicates {
        diagnostics.push(Diagnostic::DuplicateKey {
            metadata: listing.file_path(duplicate.file),
            key: duplicate.key.to_string(),
        });
    }

    let mut associations = Vec::with_capacity(partition.metadata.len());
    for candidate in &partition.metadata {
        let metadata = listing.file_path(candidate.file);
        let resolution = match resolve(candidate.key, &partition.media) {
            Some(r) => r,
            None => {
                diagnostics.push(Diagnostic::Unresolved { metadata, key: candidate.key.to_string() });
                continue;
            },
        };
        if let Resolution::Shortest { chosen, candidates } = &resolution {
            diagnostics.push(Diagnostic::Ambiguous {
                metadata: metadata.clone(),
                candidates: candidates.iter().map(|c| c.to_string()).collect(),
                chosen: chosen.to_string(),
            });
        }

        let Some(record) = load_record(&metadata, ctx.rows, diagnostics) else {
            continue;
        };
        let Some(identifier) = record.identifier().map(str::to_string) else {
            diagnostics.push(Diagnostic::MissingIdentifier { metadata });
            continue;
        };
        tracing::debug!(metadata = %metadata.display(), media = resolution.media(), "Associated metadata");
        let media = Path::new(directory).join(resolution.media());
        // Both components are UTF-8, so this never replaces anything.
        let media = media.to_string_lossy().into_owned();
        associations.push(Association { identifier, media, record });
    }
    associations
}

/// Parses a metadata file and applies the row policy to it.
fn load_record(path: &Path, rows: RowPolicy, diagnostics: &mut Diagnostics) -> Option<MetadataRecord> {
    let document = match sidecar_record::parse_file(path) {
        Ok(d) => d,
        Err(e) => {
            diagnostics.push(Diagnostic::UnreadableRecord { metadata: path.to_path_buf(), reason: format!("{e:?}") });
            return None;
        },
    };
    if document.is_empty() {
        diagnostics.push(Diagnostic::EmptyRecord { metadata: path.to_path_buf() });
    } else if document.is_ambiguous() {
        diagnostics.push(Diagnostic::MultipleRows {
            metadata: path.to_path_buf(),
            rows: document.rows,
            kept: rows == RowPolicy::KeepFirst,
        });
    }
    rows.select(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::ffi::OsString;
    use std::fs;

    struct Fixture {
        _dir: tempfile::TempDir,
        listing: DirectoryListing,
    }

    /// Creates `files` in a fresh directory. Names ending in `.metadata.csv`
    /// get a document with the given contents (or a single row derived from
    /// the name), everything else is empty.
    fn fixture(files: &[(&str, Option<&str>)]) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            let contents = match contents {
                Some(c) => c.to_string(),
                None if name.contains(".metadata.csv") => format!("url,title\nhttp://x/{name},{name}\n"),
                None => String::new(),
            };
            fs::write(dir.path().join(name), contents).unwrap();
        }
        let mut names: Vec<OsString> = files.iter().map(|(n, _)| OsString::from(n)).collect();
        names.sort();
        let listing = DirectoryListing { path: dir.path().to_path_buf(), files: names };
        Fixture { _dir: dir, listing }
    }

    fn run(fixture: &Fixture) -> (Vec<Association>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let associations = associate_directory(&Context::default(), &fixture.listing, &mut diagnostics);
        (associations, diagnostics)
    }

    fn media_names(associations: &[Association]) -> Vec<String> {
        associations.iter().map(|a| Path::new(&a.media).file_name().unwrap().to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_end_to_end_single_photo() {
        let fixture = fixture(&[("photo1.jpg", None), ("photo1.jpg.metadata.csv", Some("url\nhttp://x/1\n"))]);
        let (associations, diagnostics) = run(&fixture);
        assert!(diagnostics.is_empty());
        assert_eq!(associations, vec![Association {
            identifier: "http://x/1".to_string(),
            media: fixture.listing.path.join("photo1.jpg").to_str().unwrap().to_string(),
            record: [("url", "http://x/1")].into_iter().collect(),
        }]);
    }

    #[rstest]
    #[case::exact_match_precedence(&["a", "ab"], "a")]
    #[case::shortest_candidate(&["abc", "ab"], "ab")]
    #[case::single_prefix(&["a.jpg", "b.jpg"], "a.jpg")]
    fn test_resolves_media(#[case] media: &[&str], #[case] expected: &str) {
        let mut files: Vec<(&str, Option<&str>)> = media.iter().map(|m| (*m, None)).collect();
        files.push(("a.metadata.csv", None));
        let (associations, _) = run(&fixture(&files));
        assert_eq!(media_names(&associations), vec![expected.to_string()]);
    }

    #[test]
    fn test_ambiguous_match_is_reported() {
        let fixture = fixture(&[("abc", None), ("ab", None), ("a.metadata.csv", None)]);
        let (_, diagnostics) = run(&fixture);
        let diagnostics: Vec<_> = diagnostics.into_iter().collect();
        assert_eq!(diagnostics, vec![Diagnostic::Ambiguous {
            metadata: fixture.listing.path.join("a.metadata.csv"),
            candidates: vec!["ab".to_string(), "abc".to_string()],
            chosen: "ab".to_string(),
        }]);
    }

    #[test]
    fn test_unresolvable_record_is_skipped() {
        let fixture = fixture(&[("a.jpg", None), ("x.metadata.csv", None)]);
        let (associations, diagnostics) = run(&fixture);
        assert!(associations.is_empty());
        assert!(matches!(diagnostics.iter().next(), Some(Diagnostic::Unresolved { key, .. }) if key == "x"));
    }

    #[test]
    fn test_duplicate_key_first_wins() {
        let fixture = fixture(&[
            ("a", None),
            ("a.metadata.csv", Some("url\nhttp://x/first\n")),
            ("a.metadata.csv.1", Some("url\nhttp://x/second\n")),
        ]);
        let (associations, diagnostics) = run(&fixture);
        assert_eq!(associations.len(), 1);
        assert_eq!(associations[0].identifier, "http://x/first");
        let diagnostics: Vec<_> = diagnostics.into_iter().collect();
        assert_eq!(diagnostics, vec![Diagnostic::DuplicateKey {
            metadata: fixture.listing.path.join("a.metadata.csv.1"),
            key: "a".to_string(),
        }]);
    }

    #[test]
    fn test_empty_record_is_skipped() {
        let fixture = fixture(&[("a.jpg", None), ("a.jpg.metadata.csv", Some("url,title\n"))]);
        let (associations, diagnostics) = run(&fixture);
        assert!(associations.is_empty());
        assert!(matches!(diagnostics.iter().next(), Some(Diagnostic::EmptyRecord { .. })));
    }

    #[test]
    fn test_multiple_rows_keep_first_by_default() {
        let fixture = fixture(&[("a.jpg", None), ("a.jpg.metadata.csv", Some("url\nhttp://x/1\nhttp://x/2\n"))]);
        let (associations, diagnostics) = run(&fixture);
        assert_eq!(associations.len(), 1);
        assert_eq!(associations[0].identifier, "http://x/1");
        assert!(matches!(diagnostics.iter().next(), Some(Diagnostic::MultipleRows { rows: 2, kept: true, .. })));
    }

    #[test]
    fn test_multiple_rows_rejected_when_strict() {
        let fixture = fixture(&[("a.jpg", None), ("a.jpg.metadata.csv", Some("url\nhttp://x/1\nhttp://x/2\n"))]);
        let ctx = Context { rows: RowPolicy::RejectMultiple, ..Context::default() };
        let mut diagnostics = Diagnostics::new();
        let associations = associate_directory(&ctx, &fixture.listing, &mut diagnostics);
        assert!(associations.is_empty());
        assert!(matches!(diagnostics.iter().next(), Some(Diagnostic::MultipleRows { kept: false, .. })));
    }

    #[test]
    fn test_missing_identifier_is_skipped() {
        let fixture = fixture(&[("a.jpg", None), ("a.jpg.metadata.csv", Some("title\nBeach\n"))]);
        let (associations, diagnostics) = run(&fixture);
        assert!(associations.is_empty());
        assert!(matches!(diagnostics.iter().next(), Some(Diagnostic::MissingIdentifier { .. })));
    }

    #[test]
    fn test_unreadable_record_is_skipped() {
        let fixture = fixture(&[("a.jpg", None), ("a.jpg.metadata.csv", None)]);
        // Listed, but gone by the time it's parsed.
        fs::remove_file(fixture.listing.path.join("a.jpg.metadata.csv")).unwrap();
        let (associations, diagnostics) = run(&fixture);
        assert!(associations.is_empty());
        assert!(matches!(diagnostics.iter().next(), Some(Diagnostic::UnreadableRecord { .. })));
    }

    #[test]
    fn test_custom_marker() {
        let fixture = fixture(&[("a.jpg", None), ("a.jpg.json.csv", Some("url\nhttp://x/1\n"))]);
        let ctx = Context { marker: ".json.csv".to_string(), ..Context::default() };
        let mut diagnostics = Diagnostics::new();
        let associations = associate_directory(&ctx, &fixture.listing, &mut diagnostics);
        assert_eq!(media_names(&associations), vec!["a.jpg".to_string()]);
    }

    #[test]
    fn test_associations_follow_discovery_order() {
        let fixture = fixture(&[
            ("b.jpg", None),
            ("a.jpg", None),
            ("b.jpg.metadata.csv", None),
            ("a.jpg.metadata.csv", None),
        ]);
        let (associations, _) = run(&fixture);
        assert_eq!(media_names(&associations), vec!["a.jpg".to_string(), "b.jpg".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_directory_is_skipped() {
        use std::os::unix::ffi::OsStrExt;
        let dir = tempfile::tempdir().unwrap();
        let album = dir.path().join(std::ffi::OsStr::from_bytes(b"Album\xff"));
        fs::create_dir_all(&album).unwrap();
        fs::write(album.join("p.jpg"), b"").unwrap();
        fs::write(album.join("p.jpg.metadata.csv"), "url\nhttp://x/1\n").unwrap();
        let listing = DirectoryListing {
            path: album.clone(),
            files: vec![OsString::from("p.jpg"), OsString::from("p.jpg.metadata.csv")],
        };

        let mut diagnostics = Diagnostics::new();
        let associations = associate_directory(&Context::default(), &listing, &mut diagnostics);
        assert!(associations.is_empty());
        let diagnostics: Vec<_> = diagnostics.into_iter().collect();
        assert_eq!(diagnostics, vec![Diagnostic::NonUtf8Directory { path: album }]);
    }

    #[test]
    fn test_serializes_as_triple() {
        let association = Association {
            identifier: "http://x/1".to_string(),
            media: "/export/photo1.jpg".to_string(),
            record: [("url", "http://x/1")].into_iter().collect(),
        };
        assert_eq!(
            serde_json::to_string(&association).unwrap(),
            r#"["http://x/1","/export/photo1.jpg",{"url":"http://x/1"}]"#
        );
    }
}
