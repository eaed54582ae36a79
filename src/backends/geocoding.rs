//! Google Geocoding client used for location autocomplete in forms and filters.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{BackendError, BackendResult, Geocoder, Place};
use crate::entities::GeoPoint;

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

#[derive(Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    location: GeoPoint,
}

pub struct GoogleGeocoder {
    client: Client,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn new(api_key: String) -> BackendResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, query: &str) -> BackendResult<Vec<Place>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let resp = self
            .client
            .get(GEOCODE_URL)
            .query(&[("address", query), ("key", self.api_key.as_str())])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(BackendError::Request(format!("geocode → {}", resp.status())));
        }

        let body: GeocodeResponse = resp.json().await?;
        let detail = body.error_message.unwrap_or_else(|| body.status.clone());
        match body.status.as_str() {
            "OK" => Ok(body
                .results
                .into_iter()
                .map(|r| Place {
                    description: r.formatted_address,
                    point: r.geometry.location,
                })
                .collect()),
            "ZERO_RESULTS" => Ok(Vec::new()),
            "REQUEST_DENIED" => Err(BackendError::PermissionDenied(detail)),
            "OVER_QUERY_LIMIT" | "UNKNOWN_ERROR" => Err(BackendError::Unavailable(detail)),
            _ => Err(BackendError::Request(detail)),
        }
    }
}
