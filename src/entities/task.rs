//! Tasks and their sessions.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::geo::GeoPoint;
use crate::document::{number_field, string_field, string_list_field, Document, DocumentError, FieldValue};
use crate::utils::datetime;

/// A concrete date/time slot under a task.
///
/// All three fields are presentation strings as entered by the administrator;
/// they are not required to be comparable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

impl Session {
    pub fn new(date: impl Into<String>, start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.date.trim().is_empty() && !self.start_time.trim().is_empty() && !self.end_time.trim().is_empty()
    }

    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("date".to_string(), self.date.clone().into());
        doc.insert("start_time".to_string(), self.start_time.clone().into());
        doc.insert("end_time".to_string(), self.end_time.clone().into());
        doc
    }

    pub fn from_document(doc: &Document) -> Result<Self, DocumentError> {
        Ok(Self {
            date: string_field(doc, "date")?,
            start_time: string_field(doc, "start_time")?,
            end_time: string_field(doc, "end_time")?,
        })
    }
}

/// An administrator-defined volunteering opportunity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub start_datetime: Option<NaiveDateTime>,
    pub end_datetime: Option<NaiveDateTime>,
    pub location: String,
    pub location_point: Option<GeoPoint>,
    pub description: String,
    pub requirements: Vec<String>,
    pub sessions: Vec<Session>,
}

impl Task {
    /// Whether the task carries a location worth showing on a map.
    pub fn has_location(&self) -> bool {
        !self.location.trim().is_empty()
    }

    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("name".to_string(), self.name.clone().into());
        if let Some(ts) = self.start_datetime.and_then(datetime::local_to_timestamp) {
            doc.insert("start_datetime".to_string(), ts.into());
        }
        if let Some(ts) = self.end_datetime.and_then(datetime::local_to_timestamp) {
            doc.insert("end_datetime".to_string(), ts.into());
        }
        doc.insert("location".to_string(), self.location.clone().into());
        if let Some(point) = self.location_point {
            doc.insert("location_lat".to_string(), point.lat.into());
            doc.insert("location_lng".to_string(), point.lng.into());
        }
        doc.insert("description".to_string(), self.description.clone().into());
        doc.insert("requirements".to_string(), self.requirements.clone().into());
        doc.insert(
            "sessions".to_string(),
            FieldValue::Array(self.sessions.iter().map(|s| FieldValue::Map(s.to_document())).collect()),
        );
        doc
    }

    pub fn from_document(id: &str, doc: &Document) -> Result<Self, DocumentError> {
        let location_point = match (number_field(doc, "location_lat")?, number_field(doc, "location_lng")?) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        };

        let sessions = match doc.get("sessions") {
            None | Some(FieldValue::Null) => Vec::new(),
            Some(FieldValue::Array(values)) => values
                .iter()
                .map(|value| {
                    value
                        .as_map()
                        .ok_or_else(|| DocumentError::WrongType {
                            field: "sessions".to_string(),
                            expected: "array of maps",
                        })
                        .and_then(Session::from_document)
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(DocumentError::WrongType {
                    field: "sessions".to_string(),
                    expected: "array",
                })
            }
        };

        Ok(Self {
            id: id.to_string(),
            name: string_field(doc, "name")?,
            start_datetime: datetime_field(doc, "start_datetime")?,
            end_datetime: datetime_field(doc, "end_datetime")?,
            location: string_field(doc, "location")?,
            location_point,
            description: string_field(doc, "description")?,
            requirements: string_list_field(doc, "requirements")?,
            sessions,
        })
    }
}

/// Datetimes are written as timestamps but older documents hold the raw form input.
fn datetime_field(doc: &Document, field: &str) -> Result<Option<NaiveDateTime>, DocumentError> {
    match doc.get(field) {
        None | Some(FieldValue::Null) => Ok(None),
        Some(FieldValue::Timestamp(ts)) => Ok(Some(datetime::timestamp_to_local(*ts))),
        Some(FieldValue::String(s)) if s.is_empty() => Ok(None),
        Some(FieldValue::String(s)) => datetime::parse_task_datetime(s)
            .map(Some)
            .map_err(|_| DocumentError::WrongType {
                field: field.to_string(),
                expected: "timestamp",
            }),
        Some(_) => Err(DocumentError::WrongType {
            field: field.to_string(),
            expected: "timestamp",
        }),
    }
}
