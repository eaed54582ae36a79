//! Service abstraction layer for the hosted collaborators
//!
//! VoluntTrac does not own persistence, authentication or geocoding. Each of
//! those is reached through a narrow trait so components receive an explicit
//! handle at construction and tests can substitute in-memory fakes.
//!
//! - [`IdentityProvider`]: current user, auth-state subscription, sign-in/out, re-authentication
//! - [`DocumentStore`]: document get/set/add/list
//! - [`Geocoder`]: resolve free-text places to coordinates
//! - [`Geolocator`]: the device's own position

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::document::{Document, DocumentError};
use crate::entities::GeoPoint;

/// Watch-channel backed auth-state notification shared by identity providers
pub mod auth_state;

/// Builds a [`Services`] bundle from configuration
pub mod factory;

/// Firebase Auth (Identity Toolkit REST) identity provider
pub mod firebase;

/// Firestore REST document store and its value codec
pub mod firestore;

/// Google Geocoding REST client
pub mod geocoding;

/// Device geolocation sourced from configuration
pub mod geolocation;

/// In-memory implementations used by tests and offline mode
pub mod memory;

pub use auth_state::{AuthState, AuthSubscription};

/// An authenticated user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub uid: String,
    pub email: String,
    pub last_sign_in: Option<DateTime<Utc>>,
}

/// A resolved place from the geocoder.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub description: String,
    pub point: GeoPoint,
}

/// Errors surfaced by the hosted services
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Invalid email or password")]
    InvalidCredential,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            BackendError::Unavailable(err.to_string())
        } else if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Request(err.to_string())
        }
    }
}

impl From<DocumentError> for BackendError {
    fn from(err: DocumentError) -> Self {
        BackendError::Decode(err.to_string())
    }
}

/// Hosted identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The currently signed-in user, if any
    fn current_user(&self) -> Option<User>;

    /// Subscribe to auth-state changes. Cancel the handle on teardown.
    fn subscribe(&self) -> AuthSubscription;

    /// Sign in with email and password
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<User>;

    /// Sign the current user out
    async fn sign_out(&self) -> BackendResult<()>;

    /// Re-verify the current user's password without changing who is signed in
    async fn re_authenticate(&self, password: &str) -> BackendResult<()>;
}

/// Hosted document database
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document. A missing document is `Ok(None)`, not an error.
    async fn get_document(&self, collection: &str, id: &str) -> BackendResult<Option<Document>>;

    /// Create or fully replace a document
    async fn set_document(&self, collection: &str, id: &str, document: &Document) -> BackendResult<()>;

    /// Create a document with a generated id and return that id
    async fn add_document(&self, collection: &str, document: &Document) -> BackendResult<String>;

    /// List every document in a collection as `(id, document)` pairs
    async fn list_documents(&self, collection: &str) -> BackendResult<Vec<(String, Document)>>;
}

/// Hosted geocoding / place autocomplete
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> BackendResult<Vec<Place>>;
}

/// The host device's position source
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> BackendResult<GeoPoint>;
}

/// The set of service handles injected into the application.
///
/// Cheap to clone; every handle is an `Arc`.
#[derive(Clone)]
pub struct Services {
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn DocumentStore>,
    pub geocoder: Arc<dyn Geocoder>,
    pub geolocator: Arc<dyn Geolocator>,
}

impl Services {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
        geocoder: Arc<dyn Geocoder>,
        geolocator: Arc<dyn Geolocator>,
    ) -> Self {
        Self {
            identity,
            store,
            geocoder,
            geolocator,
        }
    }
}
