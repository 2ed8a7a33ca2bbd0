//! USGS Elevation Point Query Service client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::ElevationProvider;
use crate::config::ProvidersConfig;
use crate::{MediSnowError, Result, http};

/// EPQS answers with this value for points outside its coverage
const NO_DATA: f64 = -1_000_000.0;

#[derive(Debug, Deserialize)]
pub struct ElevationPointResponse {
    pub value: ElevationValue,
}

/// EPQS sends the value either as a number or as a numeric string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ElevationValue {
    Number(f64),
    Text(String),
}

impl ElevationValue {
    fn feet(&self) -> Result<f64> {
        let feet = match self {
            ElevationValue::Number(value) => *value,
            ElevationValue::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                MediSnowError::malformed(format!("USGS elevation '{text}' is not a number"))
            })?,
        };
        if feet <= NO_DATA {
            return Err(MediSnowError::api("USGS has no elevation data for this point"));
        }
        Ok(feet)
    }
}

pub struct UsgsClient {
    client: Client,
    base_url: String,
}

impl UsgsClient {
    pub fn new(config: &ProvidersConfig) -> Result<Self> {
        Self::with_base_url(&config.usgs_url, config)
    }

    pub fn with_base_url(base_url: &str, config: &ProvidersConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ElevationProvider for UsgsClient {
    async fn elevation_feet(&self, latitude: f64, longitude: f64) -> Result<f64> {
        let url = format!(
            "{}/json?x={longitude}&y={latitude}&units=Feet&wkid=4326",
            self.base_url
        );
        let response: ElevationPointResponse = http::get_json(&self.client, "USGS", &url).await?;
        let feet = response.value.feet()?;
        debug!(feet, "Fetched point elevation");
        Ok(feet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_text_values() {
        let number: ElevationPointResponse = serde_json::from_str(r#"{"value": 8150.5}"#).unwrap();
        assert_eq!(number.value.feet().unwrap(), 8150.5);

        let text: ElevationPointResponse = serde_json::from_str(r#"{"value": "8150.5"}"#).unwrap();
        assert_eq!(text.value.feet().unwrap(), 8150.5);
    }

    #[test]
    fn test_no_data_value() {
        let response: ElevationPointResponse = serde_json::from_str(r#"{"value": -1000000}"#).unwrap();
        assert!(response.value.feet().is_err());
    }
}
