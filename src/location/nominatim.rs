//! OpenStreetMap Nominatim reverse geocoding client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::ReverseGeocodeProvider;
use crate::config::ProvidersConfig;
use crate::models::LocationInfo;
use crate::{MediSnowError, Result, http};

#[derive(Debug, Deserialize, Default)]
pub struct LookupResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub address: Address,
    /// Present instead of a place when nothing is found
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Address {
    #[serde(default)]
    pub county: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub country_code: String,
}

impl From<LookupResponse> for LocationInfo {
    fn from(response: LookupResponse) -> Self {
        let name = if response.name.is_empty() {
            response.display_name
        } else {
            response.name
        };
        LocationInfo {
            name,
            county: response.address.county,
            state: response.address.state,
            country: response.address.country,
            country_code: response.address.country_code,
        }
    }
}

pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(config: &ProvidersConfig) -> Result<Self> {
        Self::with_base_url(&config.nominatim_url, config)
    }

    pub fn with_base_url(base_url: &str, config: &ProvidersConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ReverseGeocodeProvider for NominatimClient {
    async fn lookup(&self, latitude: f64, longitude: f64) -> Result<LocationInfo> {
        let url = format!(
            "{}/reverse?lat={latitude}&lon={longitude}&format=json",
            self.base_url
        );
        let response: LookupResponse = http::get_json(&self.client, "Nominatim", &url).await?;
        if let Some(error) = response.error {
            return Err(MediSnowError::api(format!("Nominatim lookup failed: {error}")));
        }
        Ok(response.into())
    }
}
