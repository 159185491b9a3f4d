use serde::ser::{Serialize, SerializeMap, Serializer};

/// Name of the field every consumed record must carry; its value identifies
/// the media item across exports.
pub const IDENTIFIER_FIELD: &str = "url";

/// One data row of a metadata document, keyed by the header row.
///
/// Fields keep the order of the header. No schema is enforced: any set of
/// columns is accepted, and only [`IDENTIFIER_FIELD`] is looked up
/// downstream. Serializes as a map (a JSON object, in header order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    fields: Vec<(String, String)>,
}
impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, returning the previous value if the field already
    /// existed. A replaced field keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.fields.push((name, value));
                None
            },
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// Value of the [`IDENTIFIER_FIELD`], if present.
    pub fn identifier(&self) -> Option<&str> {
        self.get(IDENTIFIER_FIELD)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}
impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MetadataRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = Self::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}
impl Serialize for MetadataRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut record = MetadataRecord::new();
        assert_eq!(record.insert("url", "http://x/1"), None);
        assert_eq!(record.insert("title", "Beach"), None);
        assert_eq!(record.insert("url", "http://x/2"), Some("http://x/1".to_string()));
        assert_eq!(record.len(), 2);
        assert_eq!(record.iter().collect::<Vec<_>>(), vec![("url", "http://x/2"), ("title", "Beach")]);
    }

    #[test]
    fn test_identifier() {
        let record: MetadataRecord = [("title", "Beach")].into_iter().collect();
        assert_eq!(record.identifier(), None);
        let record: MetadataRecord = [("title", "Beach"), ("url", "http://x/1")].into_iter().collect();
        assert_eq!(record.identifier(), Some("http://x/1"));
    }

    #[test]
    fn test_serializes_in_header_order() {
        let record: MetadataRecord = [("zeta", "1"), ("alpha", "2"), ("url", "http://x/1")].into_iter().collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"zeta":"1","alpha":"2","url":"http://x/1"}"#);
    }
}
