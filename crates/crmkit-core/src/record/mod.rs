//! Records and their field maps.
//!
//! A [`Record`] pairs a store-assigned [`RecordId`] with the document body.
//! Bodies travel to and from stores as [`Fields`]: a JSON object without the
//! identifier. Typed documents are converted at the repository boundary.

mod fields;

pub use fields::{Fields, ID_FIELD, from_fields, to_fields};

use serde::{Deserialize, Serialize};

use crate::types::RecordId;

/// A record read from a collection.
///
/// Serializes flat, with the identifier next to the document's own fields:
/// `{"id": "...", "name": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record<T> {
    /// Store-assigned identifier.
    pub id: RecordId,

    /// The document body.
    #[serde(flatten)]
    pub data: T,
}

impl<T> Record<T> {
    pub fn new(id: RecordId, data: T) -> Self {
        Self { id, data }
    }

    /// Transform the document body, keeping the identifier.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Record<U> {
        Record {
            id: self.id,
            data: f(self.data),
        }
    }
}

/// A document exactly as a store returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDoc {
    /// Store-assigned identifier.
    pub id: RecordId,

    /// Stored fields, never including the identifier.
    pub fields: Fields,
}

impl RawDoc {
    pub fn new(id: RecordId, fields: Fields) -> Self {
        Self { id, fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_serializes_flat() {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), json!("Jane"));
        let record = Record::new(RecordId::new("abc").unwrap(), fields);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"id": "abc", "name": "Jane"}));
    }

    #[test]
    fn raw_doc_wire_shape() {
        let doc: RawDoc =
            serde_json::from_value(json!({"id": "r1", "fields": {"amount": 12.5}})).unwrap();
        assert_eq!(doc.id.as_str(), "r1");
        assert_eq!(doc.fields["amount"], json!(12.5));
    }

    #[test]
    fn map_keeps_id() {
        let record = Record::new(RecordId::new("r1").unwrap(), 2);
        let mapped = record.map(|n| n * 10);
        assert_eq!(mapped.id.as_str(), "r1");
        assert_eq!(mapped.data, 20);
    }
}
