//! Per-file metadata sidecar records.
//!
//! Exports describe each media file with a tiny comma-delimited document: a
//! header row, then (normally) exactly one data row. [`parse_file`] reads such
//! a document into a [`Document`], and a [`RowPolicy`] decides which
//! [`MetadataRecord`], if any, it stands for.
//!
//! ```
//! use sidecar_record::{RowPolicy, parse};
//!
//! let document = parse("url,title\nhttp://x/1,Beach\n".as_bytes()).unwrap();
//! let record = RowPolicy::KeepFirst.select(document).unwrap();
//! assert_eq!(record.identifier(), Some("http://x/1"));
//! assert_eq!(record.get("title"), Some("Beach"));
//! ```

pub mod error;
mod policy;
mod record;

pub use crate::policy::{Document, RowPolicy};
pub use crate::record::{IDENTIFIER_FIELD, MetadataRecord};

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::instrument;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Reads a metadata document from a file.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn parse_file(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    let file = File::open(path).or_raise(|| ErrorKind::Open(path.to_path_buf()))?;
    parse(file).or_raise(|| ErrorKind::Document(path.to_path_buf()))
}

/// Reads a metadata document: the header row, then every data row.
///
/// Row lengths may vary. A row shorter than the header leaves the trailing
/// fields unset; values beyond the header are dropped.
pub fn parse(reader: impl Read) -> Result<Document> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .or_raise(|| ErrorKind::Malformed)?
        .iter()
        .enumerate()
        .map(|(i, name)| match i {
            0 => name.trim_start_matches(BYTE_ORDER_MARK).to_string(),
            _ => name.to_string(),
        })
        .collect();

    let mut rows = 0;
    let mut first = None;
    for row in reader.records() {
        let row = row.or_raise(|| ErrorKind::Malformed)?;
        rows += 1;
        if first.is_none() {
            if row.len() > headers.len() {
                tracing::debug!(values = row.len(), columns = headers.len(), "Ignoring values beyond header");
            }
            first = Some(headers.iter().zip(row.iter()).collect::<MetadataRecord>());
        }
    }
    Ok(Document { rows, first })
}
