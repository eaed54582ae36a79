//! Service factory for creating the service bundle from configuration.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::sync::Arc;

use super::firebase::FirebaseAuth;
use super::firestore::FirestoreClient;
use super::geocoding::GoogleGeocoder;
use super::geolocation::ConfiguredGeolocator;
use super::memory::{InMemoryGeocoder, InMemoryIdentity, InMemoryServices, InMemoryStore};
use super::{Geocoder, Services};
use crate::config::Config;
use crate::constants::{COLLECTION_PROFILES, COLLECTION_TASKS};
use crate::entities::profile::{ROLE_ADMIN, ROLE_VOLUNTEER};
use crate::entities::{GeoPoint, Profile, Session, Task};

/// Demo account credentials for `--offline` mode
pub const DEMO_VOLUNTEER_EMAIL: &str = "volunteer@voluntrac.local";
pub const DEMO_ADMIN_EMAIL: &str = "admin@voluntrac.local";
pub const DEMO_PASSWORD: &str = "voluntrac";

/// Create the hosted service bundle.
///
/// # Errors
/// Returns error if:
/// - The Firebase API key environment variable is missing
/// - An HTTP client cannot be built
pub fn build_services(config: &Config) -> Result<Services> {
    let api_key = config.firebase_api_key()?;

    let auth = FirebaseAuth::new(api_key).context("Failed to create identity client")?;
    let store =
        FirestoreClient::new(&config.firebase.project_id, auth.token_handle()).context("Failed to create document client")?;

    let geocoder: Arc<dyn Geocoder> = match config.maps_api_key() {
        Some(key) => Arc::new(GoogleGeocoder::new(key).context("Failed to create geocoding client")?),
        None => {
            log::warn!(
                "{} not set, place search will return no results",
                config.maps.api_key_env
            );
            Arc::new(InMemoryGeocoder::new())
        }
    };

    log::info!("Using Firebase project '{}'", config.firebase.project_id);

    Ok(Services::new(
        Arc::new(auth),
        Arc::new(store),
        geocoder,
        Arc::new(geolocator(config)),
    ))
}

/// Create in-memory services seeded with demo accounts and tasks.
pub fn build_offline_services(config: &Config) -> InMemoryServices {
    let identity = InMemoryIdentity::new()
        .with_account(DEMO_VOLUNTEER_EMAIL, DEMO_PASSWORD, "demo-volunteer")
        .with_account(DEMO_ADMIN_EMAIL, DEMO_PASSWORD, "demo-admin");

    let store = InMemoryStore::new();
    seed_profiles(&store);
    seed_tasks(&store);

    let geocoder = InMemoryGeocoder::new()
        .with_place("Marina Bay, Singapore", GeoPoint::new(1.2834, 103.8607))
        .with_place("East Coast Park, Singapore", GeoPoint::new(1.3008, 103.9122))
        .with_place("Jurong East, Singapore", GeoPoint::new(1.3329, 103.7436));

    log::info!("Offline mode: demo accounts {} and {}", DEMO_VOLUNTEER_EMAIL, DEMO_ADMIN_EMAIL);

    InMemoryServices::new(identity, store)
        .with_geocoder(geocoder)
        .with_geolocator(geolocator(config))
}

fn geolocator(config: &Config) -> ConfiguredGeolocator {
    ConfiguredGeolocator::new(config.device.location_enabled, config.device.position())
}

fn seed_profiles(store: &InMemoryStore) {
    let volunteer = Profile {
        role: ROLE_VOLUNTEER.to_string(),
        username: "demo_volunteer".to_string(),
        email: DEMO_VOLUNTEER_EMAIL.to_string(),
        full_name: "Demo Volunteer".to_string(),
        ..Profile::default()
    };
    let admin = Profile {
        role: ROLE_ADMIN.to_string(),
        username: "demo_admin".to_string(),
        email: DEMO_ADMIN_EMAIL.to_string(),
        full_name: "Demo Administrator".to_string(),
        organisation: "VoluntTrac".to_string(),
        ..Profile::default()
    };
    store.insert(COLLECTION_PROFILES, "demo-volunteer", volunteer.to_document());
    store.insert(COLLECTION_PROFILES, "demo-admin", admin.to_document());
}

fn seed_tasks(store: &InMemoryStore) {
    let at = |y, m, d, h| NaiveDate::from_ymd_opt(y, m, d).and_then(|date| date.and_hms_opt(h, 0, 0));

    let tasks = [
        Task {
            id: "beach-cleanup".to_string(),
            name: "Beach cleanup".to_string(),
            start_datetime: at(2026, 11, 7, 9),
            end_datetime: at(2026, 11, 8, 12),
            location: "East Coast Park, Singapore".to_string(),
            location_point: Some(GeoPoint::new(1.3008, 103.9122)),
            description: "Collect litter along the shoreline.".to_string(),
            requirements: vec!["Gloves".to_string(), "Water bottle".to_string()],
            sessions: vec![
                Session::new("2026-11-07", "9:00 AM", "12:00 PM"),
                Session::new("2026-11-08", "9:00 AM", "12:00 PM"),
            ],
        },
        Task {
            id: "food-bank".to_string(),
            name: "Food bank packing".to_string(),
            start_datetime: at(2026, 11, 14, 14),
            end_datetime: at(2026, 11, 14, 18),
            location: "Jurong East, Singapore".to_string(),
            location_point: Some(GeoPoint::new(1.3329, 103.7436)),
            description: "Pack grocery bundles for families.".to_string(),
            requirements: Vec::new(),
            sessions: vec![
                Session::new("2026-11-14", "2:00 PM", "4:00 PM"),
                Session::new("2026-11-14", "4:00 PM", "6:00 PM"),
            ],
        },
        Task {
            id: "remote-tutoring".to_string(),
            name: "Remote tutoring".to_string(),
            description: "Online maths tutoring for secondary students.".to_string(),
            sessions: vec![Session::new("2026-11-21", "7:00 PM", "8:30 PM")],
            ..Task::default()
        },
    ];

    for task in &tasks {
        store.insert(COLLECTION_TASKS, &task.id, task.to_document());
    }
}
