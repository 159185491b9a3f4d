use std::collections::HashSet;

/// A file recognised as a metadata sidecar, and the key derived from its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub file: &'a str,
    pub key: &'a str,
}

/// A directory's files, split into metadata candidates and media candidates.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Partition<'a> {
    /// Metadata candidates with unique keys, in enumeration order.
    pub metadata: Vec<Candidate<'a>>,
    /// Metadata candidates whose key was already claimed by an earlier one.
    pub duplicates: Vec<Candidate<'a>>,
    /// Every other file, sorted by name.
    pub media: Vec<&'a str>,
}

/// How a metadata candidate was matched to a media file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// A media file is named exactly like the key.
    Exact(&'a str),
    /// Exactly one media file starts with the key.
    Prefix(&'a str),
    /// Several media files start with the key. `candidates` is ordered by
    /// length, then name; `chosen` is the first of them.
    Shortest { chosen: &'a str, candidates: Vec<&'a str> },
}
impl<'a> Resolution<'a> {
    /// Name of the matched media file.
    pub fn media(&self) -> &'a str {
        match self {
            Self::Exact(m) | Self::Prefix(m) => *m,
            Self::Shortest { chosen, .. } => *chosen,
        }
    }
}

/// The file name up to the **last** occurrence of `marker`, or `None` if the
/// name doesn't contain it.
///
/// ```
/// use sidecar_library::associate::derived_key;
/// assert_eq!(derived_key("IMG_01.jpg.metadata.csv", ".metadata.csv"), Some("IMG_01.jpg"));
/// assert_eq!(derived_key("IMG_01.jpg", ".metadata.csv"), None);
/// ```
pub fn derived_key<'a>(name: &'a str, marker: &str) -> Option<&'a str> {
    name.rfind(marker).map(|position| &name[..position])
}

/// Splits file names into metadata candidates (names containing `marker`)
/// and media candidates (everything else). The first candidate to claim a
/// key keeps it.
pub fn partition<'a>(files: impl IntoIterator<Item = &'a str>, marker: &str) -> Partition<'a> {
    let mut partition = Partition::default();
    let mut seen = HashSet::new();
    for file in files {
        match derived_key(file, marker) {
            Some(key) if seen.insert(key) => partition.metadata.push(Candidate { file, key }),
            Some(key) => partition.duplicates.push(Candidate { file, key }),
            None => partition.media.push(file),
        }
    }
    partition.media.sort_unstable();
    partition
}

/// Finds the media file described by `key`.
///
/// `media` must be sorted (as produced by [`partition`]): every name starting
/// with `key` then sits in one contiguous run, beginning with the exact match
/// if there is one.
pub fn resolve<'a>(key: &str, media: &[&'a str]) -> Option<Resolution<'a>> {
    let start = media.partition_point(|name| *name < key);
    let matches = &media[start..];
    let count = matches.iter().take_while(|name| name.starts_with(key)).count();
    match count {
        0 => None,
        _ if matches[0] == key => Some(Resolution::Exact(matches[0])),
        1 => Some(Resolution::Prefix(matches[0])),
        _ => {
            let mut candidates = matches[..count].to_vec();
            // Stable: equal lengths keep name order.
            candidates.sort_by_key(|name| name.len());
            Some(Resolution::Shortest { chosen: candidates[0], candidates })
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const MARKER: &str = ".metadata.csv";

    #[rstest]
    #[case("photo1.jpg.metadata.csv", Some("photo1.jpg"))]
    #[case("photo1.metadata.csv", Some("photo1"))]
    #[case("a.metadata.csv.metadata.csv", Some("a.metadata.csv"))]
    #[case("a.metadata.csv.bak", Some("a"))]
    #[case(".metadata.csv", Some(""))]
    #[case("photo1.jpg", None)]
    #[case("metadata.csv", None)]
    fn test_derived_key(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(derived_key(name, MARKER), expected);
    }

    #[test]
    fn test_partition() {
        let files = ["b.jpg", "a.jpg.metadata.csv", "a.jpg", "b.jpg.metadata.csv"];
        let partition = partition(files, MARKER);
        assert_eq!(partition.media, vec!["a.jpg", "b.jpg"]);
        assert_eq!(partition.metadata, vec![
            Candidate { file: "a.jpg.metadata.csv", key: "a.jpg" },
            Candidate { file: "b.jpg.metadata.csv", key: "b.jpg" },
        ]);
        assert!(partition.duplicates.is_empty());
    }

    #[test]
    fn test_partition_first_key_wins() {
        let files = ["a.metadata.csv", "a.metadata.csv.old", "a"];
        let partition = partition(files, MARKER);
        assert_eq!(partition.metadata, vec![Candidate { file: "a.metadata.csv", key: "a" }]);
        assert_eq!(partition.duplicates, vec![Candidate { file: "a.metadata.csv.old", key: "a" }]);
        assert_eq!(partition.media, vec!["a"]);
    }

    #[test]
    fn test_exact_match_wins_over_prefix() {
        assert_eq!(resolve("a", &["a", "ab"]), Some(Resolution::Exact("a")));
    }

    #[test]
    fn test_exact_match_wins_over_shorter_names() {
        // "a" sorts before "a.jpg" and is shorter, but isn't an exact match for "a.jpg".
        assert_eq!(resolve("a.jpg", &["a", "a.jpg", "a.jpg(1).jpg"]), Some(Resolution::Exact("a.jpg")));
    }

    #[test]
    fn test_single_prefix_match() {
        assert_eq!(resolve("IMG_0001", &["IMG_0001.JPG", "IMG_0002.JPG"]), Some(Resolution::Prefix("IMG_0001.JPG")));
    }

    #[test]
    fn test_shortest_candidate_chosen() {
        assert_eq!(
            resolve("a", &["ab", "abc"]),
            Some(Resolution::Shortest { chosen: "ab", candidates: vec!["ab", "abc"] })
        );
    }

    #[test]
    fn test_equal_lengths_keep_name_order() {
        assert_eq!(
            resolve("photo", &["photo-a.jpg", "photo-b.jpg", "photo-edited.jpg"]),
            Some(Resolution::Shortest {
                chosen: "photo-a.jpg",
                candidates: vec!["photo-a.jpg", "photo-b.jpg", "photo-edited.jpg"],
            })
        );
    }

    #[rstest]
    #[case::nothing_starts_with_key("x", &["a", "ab", "y"])]
    #[case::no_media("x", &[])]
    #[case::key_longer_than_names("abcd", &["a", "ab", "abc"])]
    fn test_unresolved(#[case] key: &str, #[case] media: &[&str]) {
        assert_eq!(resolve(key, media), None);
    }

    #[test]
    fn test_resolution_media() {
        assert_eq!(Resolution::Exact("a").media(), "a");
        assert_eq!(Resolution::Prefix("ab").media(), "ab");
        assert_eq!(Resolution::Shortest { chosen: "ab", candidates: vec!["ab", "abc"] }.media(), "ab");
    }
}
