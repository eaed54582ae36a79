use async_trait::async_trait;

use super::{BackendError, BackendResult, Geolocator};
use crate::entities::GeoPoint;

/// Device position taken from configuration.
///
/// A terminal has no positioning hardware, so the "device" location is what
/// the user configured. Disabled access reports permission denied, an unset
/// position reports unavailable, matching how a browser would fail.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredGeolocator {
    enabled: bool,
    position: Option<GeoPoint>,
}

impl ConfiguredGeolocator {
    pub fn new(enabled: bool, position: Option<GeoPoint>) -> Self {
        Self { enabled, position }
    }

    pub fn fixed(position: GeoPoint) -> Self {
        Self::new(true, Some(position))
    }

    pub fn denied() -> Self {
        Self::new(false, None)
    }
}

#[async_trait]
impl Geolocator for ConfiguredGeolocator {
    async fn current_position(&self) -> BackendResult<GeoPoint> {
        if !self.enabled {
            return Err(BackendError::PermissionDenied("location access is disabled".to_string()));
        }
        self.position
            .ok_or_else(|| BackendError::Unavailable("device position is unknown".to_string()))
    }
}
