//! In-memory service implementations
//!
//! Used by the test suite and by `--offline` mode. They honour the same
//! contracts as the hosted services: missing documents read as `None`,
//! `set_document` overwrites, sign-out notifies subscribers.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::geolocation::ConfiguredGeolocator;
use super::{
    AuthState, AuthSubscription, BackendError, BackendResult, DocumentStore, Geocoder, IdentityProvider, Place,
    Services, User,
};
use crate::document::Document;
use crate::entities::GeoPoint;

struct Account {
    password: String,
    user: User,
}

/// Identity provider holding accounts in memory
#[derive(Default)]
pub struct InMemoryIdentity {
    accounts: Mutex<HashMap<String, Account>>,
    state: AuthState,
    sign_out_error: Mutex<Option<BackendError>>,
    re_auth_calls: AtomicUsize,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, email: &str, password: &str, uid: &str) -> Self {
        if let Ok(mut accounts) = self.accounts.lock() {
            accounts.insert(
                email.to_string(),
                Account {
                    password: password.to_string(),
                    user: User {
                        uid: uid.to_string(),
                        email: email.to_string(),
                        last_sign_in: None,
                    },
                },
            );
        }
        self
    }

    /// Mark `email` as signed in without checking a password.
    pub fn force_sign_in(&self, email: &str) -> Option<User> {
        let user = self.accounts.lock().ok()?.get(email).map(|a| a.user.clone())?;
        self.state.set(Some(user.clone()));
        Some(user)
    }

    /// Make the next sign-out calls fail with `err`.
    pub fn fail_sign_out(&self, err: BackendError) {
        if let Ok(mut slot) = self.sign_out_error.lock() {
            *slot = Some(err);
        }
    }

    pub fn re_auth_calls(&self) -> usize {
        self.re_auth_calls.load(Ordering::SeqCst)
    }

    fn check_password(&self, email: &str, password: &str) -> BackendResult<User> {
        let accounts = self
            .accounts
            .lock()
            .map_err(|_| BackendError::Unavailable("identity store poisoned".to_string()))?;
        match accounts.get(email) {
            Some(account) if account.password == password => Ok(account.user.clone()),
            _ => Err(BackendError::InvalidCredential),
        }
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    fn current_user(&self) -> Option<User> {
        self.state.current()
    }

    fn subscribe(&self) -> AuthSubscription {
        self.state.subscribe()
    }

    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<User> {
        let mut user = self.check_password(email, password)?;
        user.last_sign_in = Some(Utc::now());
        if let Ok(mut accounts) = self.accounts.lock() {
            if let Some(account) = accounts.get_mut(email) {
                account.user.last_sign_in = user.last_sign_in;
            }
        }
        self.state.set(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        let pending = self.sign_out_error.lock().ok().and_then(|slot| slot.clone());
        if let Some(err) = pending {
            return Err(err);
        }
        self.state.set(None);
        Ok(())
    }

    async fn re_authenticate(&self, password: &str) -> BackendResult<()> {
        self.re_auth_calls.fetch_add(1, Ordering::SeqCst);
        let user = self.current_user().ok_or(BackendError::NotAuthenticated)?;
        self.check_password(&user.email, password).map(|_| ())
    }
}

type Collections = HashMap<String, BTreeMap<String, Document>>;

/// Document store holding collections in memory
#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<Collections>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document without counting it as a write.
    pub fn insert(&self, collection: &str, id: &str, document: Document) {
        if let Ok(mut collections) = self.collections.lock() {
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), document);
        }
    }

    pub fn document(&self, collection: &str, id: &str) -> Option<Document> {
        self.collections.lock().ok()?.get(collection)?.get(id).cloned()
    }

    /// Number of successful `set_document`/`add_document` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> BackendResult<std::sync::MutexGuard<'_, Collections>> {
        self.collections
            .lock()
            .map_err(|_| BackendError::Unavailable("document store poisoned".to_string()))
    }

    fn check_writable(&self) -> BackendResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(BackendError::Unavailable("writes are failing".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get_document(&self, collection: &str, id: &str) -> BackendResult<Option<Document>> {
        Ok(self.lock()?.get(collection).and_then(|c| c.get(id)).cloned())
    }

    async fn set_document(&self, collection: &str, id: &str, document: &Document) -> BackendResult<()> {
        self.check_writable()?;
        self.lock()?
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn add_document(&self, collection: &str, document: &Document) -> BackendResult<String> {
        self.check_writable()?;
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.lock()?
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), document.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn list_documents(&self, collection: &str) -> BackendResult<Vec<(String, Document)>> {
        Ok(self
            .lock()?
            .get(collection)
            .map(|c| c.iter().map(|(id, doc)| (id.clone(), doc.clone())).collect())
            .unwrap_or_default())
    }
}

/// Geocoder answering from a fixed list of places
#[derive(Default)]
pub struct InMemoryGeocoder {
    places: Vec<Place>,
}

impl InMemoryGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, description: &str, point: GeoPoint) -> Self {
        self.places.push(Place {
            description: description.to_string(),
            point,
        });
        self
    }
}

#[async_trait]
impl Geocoder for InMemoryGeocoder {
    async fn geocode(&self, query: &str) -> BackendResult<Vec<Place>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .places
            .iter()
            .filter(|p| p.description.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

/// Concrete in-memory handles, kept so tests can inspect them after use.
#[derive(Clone)]
pub struct InMemoryServices {
    pub identity: Arc<InMemoryIdentity>,
    pub store: Arc<InMemoryStore>,
    pub geocoder: Arc<InMemoryGeocoder>,
    pub geolocator: Arc<ConfiguredGeolocator>,
}

impl InMemoryServices {
    pub fn new(identity: InMemoryIdentity, store: InMemoryStore) -> Self {
        Self {
            identity: Arc::new(identity),
            store: Arc::new(store),
            geocoder: Arc::new(InMemoryGeocoder::new()),
            geolocator: Arc::new(ConfiguredGeolocator::denied()),
        }
    }

    pub fn with_geocoder(mut self, geocoder: InMemoryGeocoder) -> Self {
        self.geocoder = Arc::new(geocoder);
        self
    }

    pub fn with_geolocator(mut self, geolocator: ConfiguredGeolocator) -> Self {
        self.geolocator = Arc::new(geolocator);
        self
    }

    pub fn services(&self) -> Services {
        Services::new(
            self.identity.clone(),
            self.store.clone(),
            self.geocoder.clone(),
            self.geolocator.clone(),
        )
    }
}
