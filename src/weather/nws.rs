//! National Weather Service client for area forecast discussions

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::ForecastDiscussionProvider;
use crate::config::ProvidersConfig;
use crate::{MediSnowError, Result, http};

#[derive(Debug, Deserialize)]
pub struct PointResponse {
    pub properties: PointProperties,
}

#[derive(Debug, Deserialize)]
pub struct PointProperties {
    /// Forecast office identifier, e.g. `GJT`
    pub cwa: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionResponse {
    #[serde(default)]
    pub product_text: String,
}

pub struct NwsClient {
    client: Client,
    base_url: String,
}

impl NwsClient {
    pub fn new(config: &ProvidersConfig) -> Result<Self> {
        Self::with_base_url(&config.nws_url, config)
    }

    pub fn with_base_url(base_url: &str, config: &ProvidersConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ForecastDiscussionProvider for NwsClient {
    async fn forecast_office(&self, latitude: f64, longitude: f64) -> Result<String> {
        // NWS redirects requests with more than four decimals
        let url = format!("{}/points/{latitude:.4},{longitude:.4}", self.base_url);
        let point: PointResponse = http::get_json(&self.client, "NWS", &url).await?;
        if point.properties.cwa.is_empty() {
            return Err(MediSnowError::malformed("NWS point has no forecast office"));
        }
        debug!(office = %point.properties.cwa, "Resolved NWS forecast office");
        Ok(point.properties.cwa)
    }

    async fn area_forecast_discussion(&self, office: &str) -> Result<String> {
        let url = format!(
            "{}/products/types/AFD/locations/{}/latest",
            self.base_url,
            urlencoding::encode(office)
        );
        let discussion: DiscussionResponse = http::get_json(&self.client, "NWS", &url).await?;
        Ok(discussion.product_text)
    }
}
