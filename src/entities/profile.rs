use serde::{Deserialize, Serialize};

use crate::document::{string_field, Document, DocumentError};

/// Role value stored for administrators.
pub const ROLE_ADMIN: &str = "Admin";
/// Role value stored for volunteers.
pub const ROLE_VOLUNTEER: &str = "User";

/// Per-user profile document, keyed by the user id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub role: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub dob: String,
    pub residential_address: String,
    pub organisation: String,
    pub skills: String,
}

/// The subset of profile fields a user may change after re-authenticating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEdits {
    pub full_name: String,
    pub dob: String,
    pub residential_address: String,
    pub organisation: String,
    pub skills: String,
}

impl Profile {
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case(ROLE_ADMIN)
    }

    pub fn edits(&self) -> ProfileEdits {
        ProfileEdits {
            full_name: self.full_name.clone(),
            dob: self.dob.clone(),
            residential_address: self.residential_address.clone(),
            organisation: self.organisation.clone(),
            skills: self.skills.clone(),
        }
    }

    /// Apply edits, leaving role, username and email untouched.
    pub fn apply(&mut self, edits: &ProfileEdits) {
        self.full_name = edits.full_name.clone();
        self.dob = edits.dob.clone();
        self.residential_address = edits.residential_address.clone();
        self.organisation = edits.organisation.clone();
        self.skills = edits.skills.clone();
    }

    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("role".to_string(), self.role.clone().into());
        doc.insert("username".to_string(), self.username.clone().into());
        doc.insert("email".to_string(), self.email.clone().into());
        doc.insert("fullName".to_string(), self.full_name.clone().into());
        doc.insert("dob".to_string(), self.dob.clone().into());
        doc.insert("residential_address".to_string(), self.residential_address.clone().into());
        doc.insert("organisation".to_string(), self.organisation.clone().into());
        doc.insert("skills".to_string(), self.skills.clone().into());
        doc
    }

    pub fn from_document(doc: &Document) -> Result<Self, DocumentError> {
        Ok(Self {
            role: string_field(doc, "role")?,
            username: string_field(doc, "username")?,
            email: string_field(doc, "email")?,
            full_name: string_field(doc, "fullName")?,
            dob: string_field(doc, "dob")?,
            residential_address: string_field(doc, "residential_address")?,
            organisation: string_field(doc, "organisation")?,
            skills: string_field(doc, "skills")?,
        })
    }
}
