//! avalanche.org (National Avalanche Center) public API client
//!
//! The map layer is a GeoJSON feature collection of every forecast zone; the
//! product endpoint returns the current forecast for one zone. The map layer
//! is large and changes rarely, so its raw body is kept in the persistent
//! cache when one is configured.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{AvalancheForecastProvider, MapLayerProvider};
use crate::cache::{self, PersistentCache};
use crate::config::ProvidersConfig;
use crate::{MediSnowError, Result, http};

const PROVIDER: &str = "avalanche.org";
const MAP_LAYER_CACHE_KEY: &str = "nac:map-layer";

/// Treat an explicit `null` like a missing field
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One closed ring of `[longitude, latitude]` positions
pub type Ring = Vec<[f64; 2]>;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct MapLayerResponse {
    #[serde(default)]
    pub features: Vec<MapLayerFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapLayerFeature {
    pub id: i64,
    pub properties: MapLayerProperties,
    pub geometry: ZoneGeometry,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct MapLayerProperties {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub center_id: String,
    #[serde(deserialize_with = "nullable")]
    pub link: String,
    #[serde(deserialize_with = "nullable")]
    pub off_season: bool,
}

#[derive(Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum RawGeometry {
    Polygon(Vec<Vec<Vec<f64>>>),
    MultiPolygon(Vec<Vec<Vec<Vec<f64>>>>),
}

/// Zone boundary with polygon and multipolygon rings flattened into one list.
///
/// Interior rings (holes) are kept as ordinary rings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawGeometry")]
pub struct ZoneGeometry {
    rings: Vec<Ring>,
}

impl ZoneGeometry {
    #[must_use]
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    #[must_use]
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }
}

fn to_ring(positions: Vec<Vec<f64>>) -> std::result::Result<Ring, String> {
    positions
        .into_iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => Ok([*lon, *lat]),
            _ => Err(format!("position {position:?} has fewer than two coordinates")),
        })
        .collect()
}

impl TryFrom<RawGeometry> for ZoneGeometry {
    type Error = String;

    fn try_from(raw: RawGeometry) -> std::result::Result<Self, Self::Error> {
        let polygons = match raw {
            RawGeometry::Polygon(rings) => vec![rings],
            RawGeometry::MultiPolygon(polygons) => polygons,
        };
        let rings = polygons
            .into_iter()
            .flatten()
            .map(to_ring)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { rings })
    }
}

/// Forecast product for one zone
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ForecastResponse {
    pub published_time: Option<DateTime<Utc>>,
    pub expires_time: Option<DateTime<Utc>>,
    pub author: Option<String>,
    pub bottom_line: Option<String>,
    pub hazard_discussion: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub avalanche_center: CenterResponse,
    #[serde(deserialize_with = "nullable")]
    pub forecast_avalanche_problems: Vec<ProblemResponse>,
    #[serde(deserialize_with = "nullable")]
    pub danger: Vec<DangerResponse>,
    #[serde(deserialize_with = "nullable")]
    pub forecast_zone: Vec<ZoneResponse>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CenterResponse {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub city: String,
    #[serde(deserialize_with = "nullable")]
    pub state: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProblemResponse {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub rank: i64,
    pub likelihood: Option<String>,
    pub discussion: Option<String>,
    pub media: Option<ProblemMedia>,
    #[serde(deserialize_with = "nullable")]
    pub location: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub size: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProblemMedia {
    pub url: Option<MediaUrl>,
}

/// `media.url` is an object of size variants for most centers and a bare
/// string for some
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MediaUrl {
    Sizes(MediaSizes),
    Plain(String),
    Other(Value),
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct MediaSizes {
    pub large: Option<String>,
    pub medium: Option<String>,
    pub original: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DangerResponse {
    pub lower: Option<i64>,
    pub middle: Option<i64>,
    pub upper: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub valid_day: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ZoneResponse {
    pub id: i64,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub state: String,
}

pub struct NacClient {
    client: Client,
    base_url: String,
    cache: Option<(PersistentCache, Duration)>,
}

impl NacClient {
    pub fn new(config: &ProvidersConfig) -> Result<Self> {
        Self::with_base_url(&config.avalanche_url, config)
    }

    pub fn with_base_url(base_url: &str, config: &ProvidersConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: None,
        })
    }

    /// Keep the map layer in `cache` for roughly `ttl`
    #[must_use]
    pub fn with_cache(mut self, cache: PersistentCache, ttl: Duration) -> Self {
        self.cache = Some((cache, ttl));
        self
    }

    async fn cached_map_layer(&self) -> Option<String> {
        let (cache, _) = self.cache.as_ref()?;
        match cache.get::<String>(MAP_LAYER_CACHE_KEY).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to read map layer from cache");
                None
            }
        }
    }

    async fn store_map_layer(&self, body: &str) {
        if let Some((cache, ttl)) = &self.cache {
            if let Err(e) = cache
                .put(MAP_LAYER_CACHE_KEY, body.to_string(), cache::jittered(*ttl))
                .await
            {
                warn!(error = %e, "Failed to cache map layer");
            }
        }
    }
}

#[async_trait]
impl MapLayerProvider for NacClient {
    #[tracing::instrument(name = "nac_map_layer", level = "debug", skip(self))]
    async fn map_layer(&self) -> Result<MapLayerResponse> {
        if let Some(body) = self.cached_map_layer().await {
            debug!("Using cached map layer");
            return http::decode(PROVIDER, &body);
        }

        let url = format!("{}/v2/public/products/map-layer", self.base_url);
        let body = http::get_text(&self.client, PROVIDER, &url).await?;
        let layer: MapLayerResponse = http::decode(PROVIDER, &body)?;

        info!(zones = layer.features.len(), "Fetched avalanche map layer");
        self.store_map_layer(&body).await;
        Ok(layer)
    }
}

#[async_trait]
impl AvalancheForecastProvider for NacClient {
    #[tracing::instrument(name = "nac_forecast", level = "debug", skip(self))]
    async fn forecast(&self, center_id: &str, zone_id: i64) -> Result<ForecastResponse> {
        if center_id.is_empty() {
            return Err(MediSnowError::validation("avalanche center id is empty"));
        }
        let url = format!(
            "{}/v2/public/product?type=forecast&center_id={}&zone_id={zone_id}",
            self.base_url,
            urlencoding::encode(center_id),
        );
        http::get_json(&self.client, PROVIDER, &url).await
    }
}
