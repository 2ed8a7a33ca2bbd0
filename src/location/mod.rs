//! Forecast point resolution
//!
//! Turns a bare coordinate into a [`ForecastPoint`] by querying elevation and
//! reverse geocoding concurrently.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

pub mod nominatim;
pub mod usgs;

use crate::config::ProvidersConfig;
use crate::models::{Coordinates, Elevation, ForecastPoint, LocationInfo};
use crate::{MediSnowError, Result};

#[async_trait]
pub trait ElevationProvider: Send + Sync {
    /// Ground elevation in feet
    async fn elevation_feet(&self, latitude: f64, longitude: f64) -> Result<f64>;
}

#[async_trait]
pub trait ReverseGeocodeProvider: Send + Sync {
    async fn lookup(&self, latitude: f64, longitude: f64) -> Result<LocationInfo>;
}

pub struct LocationService {
    elevation_provider: Arc<dyn ElevationProvider>,
    location_provider: Arc<dyn ReverseGeocodeProvider>,
}

impl LocationService {
    pub fn new(
        elevation_provider: Arc<dyn ElevationProvider>,
        location_provider: Arc<dyn ReverseGeocodeProvider>,
    ) -> Self {
        Self {
            elevation_provider,
            location_provider,
        }
    }

    /// Service wired to the USGS and Nominatim clients
    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        Ok(Self::new(
            Arc::new(usgs::UsgsClient::new(config)?),
            Arc::new(nominatim::NominatimClient::new(config)?),
        ))
    }

    /// Resolve elevation and place metadata for a coordinate.
    ///
    /// When both lookups fail both errors are reported; when one fails only
    /// its error is returned.
    #[tracing::instrument(name = "get_forecast_point", skip(self))]
    pub async fn get_forecast_point(&self, latitude: f64, longitude: f64) -> Result<ForecastPoint> {
        let coordinates = Coordinates::new(latitude, longitude)?;

        let (elevation, location) = futures::future::join(
            self.elevation_provider.elevation_feet(latitude, longitude),
            self.location_provider.lookup(latitude, longitude),
        )
        .await;

        let (feet, location) = match (elevation, location) {
            (Ok(feet), Ok(location)) => (feet, location),
            (Err(elevation), Err(location)) => {
                error!(%elevation, %location, "Both point lookups failed");
                return Err(MediSnowError::MultipleSourceFailure {
                    elevation: elevation.to_string(),
                    location: location.to_string(),
                });
            }
            (Err(e), Ok(_)) => {
                error!(error = %e, "Elevation provider error");
                return Err(e);
            }
            (Ok(_), Err(e)) => {
                error!(error = %e, "Location provider error");
                return Err(e);
            }
        };

        debug!(name = %location.name, feet, "Resolved forecast point");
        Ok(ForecastPoint {
            coordinates,
            elevation: Elevation::from_feet(feet),
            location,
        })
    }
}
