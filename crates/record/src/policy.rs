use crate::MetadataRecord;
use serde::{Deserialize, Serialize};

/// A parsed metadata document: its first data row and how many data rows it
/// contained in total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub rows: usize,
    pub first: Option<MetadataRecord>,
}
impl Document {
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// More than one data row for what should describe a single file.
    pub fn is_ambiguous(&self) -> bool {
        self.rows > 1
    }
}

/// How a [`Document`] becomes (at most) one [`MetadataRecord`].
///
/// Documents are expected to hold exactly one data row. This is the single
/// place deciding what happens when they don't.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowPolicy {
    /// Multi-row documents yield their first row.
    #[default]
    KeepFirst,
    /// Multi-row documents yield nothing.
    RejectMultiple,
}
impl RowPolicy {
    /// Picks the record a document yields under this policy. Empty documents
    /// never yield a record.
    pub fn select(self, document: Document) -> Option<MetadataRecord> {
        match self {
            _ if document.is_empty() => None,
            Self::RejectMultiple if document.is_ambiguous() => None,
            Self::KeepFirst | Self::RejectMultiple => document.first,
        }
    }
}
