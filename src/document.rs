//! Store-neutral document model.
//!
//! Documents mirror the Firestore value model so that entities can be written
//! through any [`DocumentStore`](crate::backends::DocumentStore) without
//! losing type information (timestamps stay timestamps, integers stay
//! integers).

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::entities::geo::GeoPoint;

/// A document is an ordered map of field names to values.
pub type Document = BTreeMap<String, FieldValue>;

/// A single typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    GeoPoint(GeoPoint),
    Array(Vec<FieldValue>),
    Map(Document),
}

/// Errors raised while mapping a document onto an entity.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    #[error("field '{field}' has unexpected type, expected {expected}")]
    WrongType { field: String, expected: &'static str },

    #[error("required field '{0}' is missing")]
    MissingField(String),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Double(d) => Some(*d),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Document> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Integer(_) => "integer",
            FieldValue::Double(_) => "double",
            FieldValue::String(_) => "string",
            FieldValue::Timestamp(_) => "timestamp",
            FieldValue::GeoPoint(_) => "geopoint",
            FieldValue::Array(_) => "array",
            FieldValue::Map(_) => "map",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Double(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl From<Document> for FieldValue {
    fn from(value: Document) -> Self {
        FieldValue::Map(value)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::Array(values.into_iter().map(Into::into).collect())
    }
}

/// Read a string field, treating absence and `null` as empty.
pub fn string_field(doc: &Document, field: &str) -> Result<String, DocumentError> {
    match doc.get(field) {
        None | Some(FieldValue::Null) => Ok(String::new()),
        Some(FieldValue::String(s)) => Ok(s.clone()),
        Some(_) => Err(DocumentError::WrongType {
            field: field.to_string(),
            expected: "string",
        }),
    }
}

/// Read an optional numeric field.
pub fn number_field(doc: &Document, field: &str) -> Result<Option<f64>, DocumentError> {
    match doc.get(field) {
        None | Some(FieldValue::Null) => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or_else(|| DocumentError::WrongType {
            field: field.to_string(),
            expected: "number",
        }),
    }
}

/// Read an array of strings, treating absence as an empty list.
pub fn string_list_field(doc: &Document, field: &str) -> Result<Vec<String>, DocumentError> {
    match doc.get(field) {
        None | Some(FieldValue::Null) => Ok(Vec::new()),
        Some(FieldValue::Array(values)) => values
            .iter()
            .map(|v| {
                v.as_str().map(str::to_string).ok_or_else(|| DocumentError::WrongType {
                    field: field.to_string(),
                    expected: "array of strings",
                })
            })
            .collect(),
        Some(_) => Err(DocumentError::WrongType {
            field: field.to_string(),
            expected: "array",
        }),
    }
}
