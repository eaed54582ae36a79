//! Volunteer assignments and the session index set they carry.

use serde::{Deserialize, Serialize};

use crate::document::{string_field, Document, DocumentError, FieldValue};

/// An ordered, duplicate-free set of session indices.
///
/// Equality ignores order; iteration follows insertion order so the UI can
/// show selections in the order they were made.
#[derive(Debug, Clone, Default, Eq, Serialize, Deserialize)]
pub struct SessionSet(Vec<usize>);

impl SessionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `index`. Returns `true` if it is now selected.
    pub fn toggle(&mut self, index: usize) -> bool {
        if let Some(pos) = self.0.iter().position(|&i| i == index) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(index);
            true
        }
    }

    pub fn insert(&mut self, index: usize) -> bool {
        if self.contains(index) {
            false
        } else {
            self.0.push(index);
            true
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    /// Drop indices that are not valid for a task with `session_count` sessions.
    pub fn retain_valid(&mut self, session_count: usize) {
        self.0.retain(|&i| i < session_count);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl PartialEq for SessionSet {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().all(|i| other.0.contains(i))
    }
}

impl FromIterator<usize> for SessionSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = SessionSet::new();
        for index in iter {
            set.insert(index);
        }
        set
    }
}

/// A volunteer's confirmed selection of sessions for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub task_id: String,
    pub volunteer_id: String,
    pub sessions: SessionSet,
}

impl Assignment {
    /// Document id under the assignments collection. One document per
    /// (task, volunteer) pair, so re-confirmation overwrites.
    pub fn document_id(task_id: &str, volunteer_id: &str) -> String {
        format!("{}_{}", task_id, volunteer_id)
    }

    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("task_id".to_string(), self.task_id.clone().into());
        doc.insert("volunteer_id".to_string(), self.volunteer_id.clone().into());
        doc.insert(
            "sessions".to_string(),
            FieldValue::Array(self.sessions.iter().map(|i| FieldValue::Integer(i as i64)).collect()),
        );
        doc
    }

    pub fn from_document(doc: &Document) -> Result<Self, DocumentError> {
        let sessions = match doc.get("sessions") {
            None | Some(FieldValue::Null) => SessionSet::new(),
            Some(FieldValue::Array(values)) => values
                .iter()
                .map(|v| {
                    v.as_i64()
                        .and_then(|i| usize::try_from(i).ok())
                        .ok_or_else(|| DocumentError::WrongType {
                            field: "sessions".to_string(),
                            expected: "array of non-negative integers",
                        })
                })
                .collect::<Result<SessionSet, _>>()?,
            Some(_) => {
                return Err(DocumentError::WrongType {
                    field: "sessions".to_string(),
                    expected: "array",
                })
            }
        };

        Ok(Self {
            task_id: string_field(doc, "task_id")?,
            volunteer_id: string_field(doc, "volunteer_id")?,
            sessions,
        })
    }
}
