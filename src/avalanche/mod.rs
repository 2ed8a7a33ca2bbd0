//! Avalanche forecasts for a coordinate
//!
//! [`AvalancheService`] loads the zone map, finds the zone enclosing the
//! point and fetches that zone's current product.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

pub mod geo;
pub mod mapping;
pub mod nac;

pub use geo::{find_zone, point_in_ring};
pub use nac::NacClient;

use crate::cache::PersistentCache;
use crate::config::MediSnowConfig;
use crate::models::{AvalancheForecast, Coordinates};
use crate::{MediSnowError, Result};

/// Source of the zone polygon collection
#[async_trait]
pub trait MapLayerProvider: Send + Sync {
    async fn map_layer(&self) -> Result<nac::MapLayerResponse>;
}

/// Source of per-zone forecast products
#[async_trait]
pub trait AvalancheForecastProvider: Send + Sync {
    async fn forecast(&self, center_id: &str, zone_id: i64) -> Result<nac::ForecastResponse>;
}

pub struct AvalancheService {
    map_layer_provider: Arc<dyn MapLayerProvider>,
    forecast_provider: Arc<dyn AvalancheForecastProvider>,
}

impl AvalancheService {
    pub fn new(
        map_layer_provider: Arc<dyn MapLayerProvider>,
        forecast_provider: Arc<dyn AvalancheForecastProvider>,
    ) -> Self {
        Self {
            map_layer_provider,
            forecast_provider,
        }
    }

    /// Service backed by one avalanche.org client, optionally caching the map layer
    pub fn from_config(config: &MediSnowConfig, cache: Option<PersistentCache>) -> Result<Self> {
        let mut client = NacClient::new(&config.providers)?;
        if let Some(cache) = cache {
            let ttl = Duration::from_secs(u64::from(config.cache.map_layer_ttl_hours) * 3600);
            client = client.with_cache(cache, ttl);
        }
        let client = Arc::new(client);
        Ok(Self::new(client.clone(), client))
    }

    /// Current avalanche forecast for the zone containing the coordinate
    #[tracing::instrument(name = "get_avalanche_forecast", skip(self))]
    pub async fn get_forecast(&self, latitude: f64, longitude: f64) -> Result<AvalancheForecast> {
        Coordinates::new(latitude, longitude)?;

        let layer = self
            .map_layer_provider
            .map_layer()
            .await
            .inspect_err(|e| error!(error = %e, "Failed to get map layer"))?;

        let Some(zone) = find_zone(&layer.features, latitude, longitude) else {
            warn!("No avalanche forecast zone found for coordinates");
            return Err(MediSnowError::NoZoneMatch { latitude, longitude });
        };
        debug!(
            zone_id = zone.id,
            zone_name = %zone.properties.name,
            center_id = %zone.properties.center_id,
            off_season = zone.properties.off_season,
            "Found forecast zone"
        );

        let response = self
            .forecast_provider
            .forecast(&zone.properties.center_id, zone.id)
            .await
            .inspect_err(|e| {
                error!(
                    center_id = %zone.properties.center_id,
                    zone_id = zone.id,
                    error = %e,
                    "Failed to get avalanche forecast"
                );
            })?;

        let forecast = mapping::map_forecast_response(zone, &response);
        debug!(
            center_id = %forecast.center.id,
            danger_ratings = forecast.danger_ratings.len(),
            problems = forecast.problems.len(),
            "Mapped avalanche forecast"
        );
        Ok(forecast)
    }
}
