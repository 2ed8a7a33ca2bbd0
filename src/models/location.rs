//! Location models for the point a forecast is produced for

use serde::{Deserialize, Serialize};

use super::units::Elevation;
use crate::{MediSnowError, Result};

/// Latitude/longitude in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Create validated coordinates
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(MediSnowError::validation(format!(
                "latitude {latitude} must be between -90 and 90"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(MediSnowError::validation(format!(
                "longitude {longitude} must be between -180 and 180"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Human-readable metadata from reverse geocoding
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct LocationInfo {
    pub name: String,
    pub county: String,
    pub state: String,
    pub country: String,
    /// ISO 3166-1 alpha-2
    pub country_code: String,
}

/// A resolved point: coordinates, ground elevation and place metadata
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastPoint {
    pub coordinates: Coordinates,
    pub elevation: Elevation,
    pub location: LocationInfo,
}
