//! Open-Meteo multi-model forecast client
//!
//! The provider returns one flat array per variable per model, keyed
//! `<variable>_<model api name>`, next to a shared `time` array.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

use super::ForecastProvider;
use crate::config::ProvidersConfig;
use crate::models::WeatherModel;
use crate::{MediSnowError, Result, http};

pub const HOURLY_VARIABLES: [&str; 20] = [
    "freezing_level_height",
    "is_day",
    "temperature_2m",
    "weather_code",
    "apparent_temperature",
    "precipitation_probability",
    "precipitation",
    "cloud_cover",
    "cloud_cover_low",
    "cloud_cover_mid",
    "cloud_cover_high",
    "visibility",
    "wind_speed_10m",
    "wind_direction_10m",
    "wind_gusts_10m",
    "relative_humidity_2m",
    "rain",
    "showers",
    "snowfall",
    "snow_depth",
];

pub const DAILY_VARIABLES: [&str; 5] = [
    "snowfall_water_equivalent_sum",
    "weather_code",
    "sunrise",
    "sunset",
    "wind_direction_10m_dominant",
];

/// Parameters of one forecast request
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_meters: f64,
    pub forecast_days: u32,
    pub timezone: String,
}

/// Raw multi-model forecast payload
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ForecastResponse {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    /// Timezone the provider used for local times
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub hourly: SeriesBlock,
    #[serde(default)]
    pub daily: SeriesBlock,
}

/// `time` plus every `<variable>_<model>` column of one block
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SeriesBlock {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(flatten)]
    pub columns: HashMap<String, Value>,
}

impl SeriesBlock {
    #[must_use]
    pub fn key(variable: &str, model: WeatherModel) -> String {
        format!("{variable}_{}", model.api_name())
    }

    fn cell(&self, variable: &str, model: WeatherModel, index: usize) -> Result<&Value> {
        let key = Self::key(variable, model);
        let column = self
            .columns
            .get(&key)
            .and_then(Value::as_array)
            .ok_or_else(|| MediSnowError::malformed(format!("missing series '{key}'")))?;
        column.get(index).ok_or_else(|| {
            MediSnowError::malformed(format!(
                "series '{key}' has {} entries, index {index} required",
                column.len()
            ))
        })
    }

    /// Numeric value of a model column; `None` when the provider sent `null`
    pub fn number(&self, variable: &str, model: WeatherModel, index: usize) -> Result<Option<f64>> {
        match self.cell(variable, model, index)? {
            Value::Null => Ok(None),
            Value::Number(number) => Ok(number.as_f64()),
            other => Err(MediSnowError::malformed(format!(
                "series '{}' holds non-numeric value {other}",
                Self::key(variable, model)
            ))),
        }
    }

    /// Text value of a model column; `None` when the provider sent `null`
    pub fn text(&self, variable: &str, model: WeatherModel, index: usize) -> Result<Option<&str>> {
        match self.cell(variable, model, index)? {
            Value::Null => Ok(None),
            Value::String(text) => Ok(Some(text.as_str())),
            other => Err(MediSnowError::malformed(format!(
                "series '{}' holds non-text value {other}",
                Self::key(variable, model)
            ))),
        }
    }
}

/// Open-Meteo forecast API client
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl OpenMeteoClient {
    /// Create a client for the configured endpoint
    pub fn new(config: &ProvidersConfig) -> Result<Self> {
        Self::with_base_url(&config.open_meteo_url, config)
    }

    pub fn with_base_url(base_url: &str, config: &ProvidersConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full request URL; units are imperial to match the measurement types
    #[must_use]
    pub fn forecast_url(&self, request: &ForecastRequest) -> String {
        let models: Vec<&str> = WeatherModel::ALL.iter().map(|m| m.api_name()).collect();
        format!(
            "{}/forecast?latitude={}&longitude={}&elevation={}&hourly={}&daily={}&models={}&timezone={}&forecast_days={}&timeformat=iso8601&wind_speed_unit=mph&temperature_unit=fahrenheit&precipitation_unit=inch",
            self.base_url,
            request.latitude,
            request.longitude,
            request.elevation_meters,
            HOURLY_VARIABLES.join(","),
            DAILY_VARIABLES.join(","),
            models.join(","),
            urlencoding::encode(&request.timezone),
            request.forecast_days,
        )
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    #[tracing::instrument(name = "open_meteo_forecast", level = "debug", skip(self))]
    async fn get_forecast(&self, request: &ForecastRequest) -> Result<ForecastResponse> {
        let url = self.forecast_url(request);
        debug!("Fetching multi-model forecast");

        let response: ForecastResponse = http::get_json(&self.client, "Open-Meteo", &url).await?;

        info!(
            hours = response.hourly.time.len(),
            days = response.daily.time.len(),
            timezone = %response.timezone,
            "Received forecast from Open-Meteo"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block() -> SeriesBlock {
        serde_json::from_value(json!({
            "time": ["2025-01-15T00:00", "2025-01-15T01:00"],
            "temperature_2m_gfs_seamless": [20.5, null],
            "sunrise_gfs_seamless": ["2025-01-15T07:19", null],
            "weather_code_gem_seamless": ["oops", 3]
        }))
        .unwrap()
    }

    #[test]
    fn test_key_naming() {
        assert_eq!(
            SeriesBlock::key("wind_gusts_10m", WeatherModel::NcepNbmConus),
            "wind_gusts_10m_ncep_nbm_conus"
        );
    }

    #[test]
    fn test_number_and_null() {
        let block = block();
        assert_eq!(block.time.len(), 2);
        assert_eq!(block.number("temperature_2m", WeatherModel::GfsSeamless, 0).unwrap(), Some(20.5));
        assert_eq!(block.number("temperature_2m", WeatherModel::GfsSeamless, 1).unwrap(), None);
        assert_eq!(
            block.text("sunrise", WeatherModel::GfsSeamless, 0).unwrap(),
            Some("2025-01-15T07:19")
        );
    }

    #[test]
    fn test_missing_and_short_series_are_malformed() {
        let block = block();
        assert!(matches!(
            block.number("temperature_2m", WeatherModel::EcmwfIfs, 0),
            Err(MediSnowError::MalformedProviderResponse { .. })
        ));
        assert!(matches!(
            block.number("temperature_2m", WeatherModel::GfsSeamless, 2),
            Err(MediSnowError::MalformedProviderResponse { .. })
        ));
        assert!(block.number("weather_code", WeatherModel::GemSeamless, 0).is_err());
    }

    #[test]
    fn test_forecast_url_requests_imperial_units_for_all_models() {
        let client =
            OpenMeteoClient::with_base_url("http://localhost/v1/", &ProvidersConfig::default()).unwrap();
        let url = client.forecast_url(&ForecastRequest {
            latitude: 39.6,
            longitude: -106.0,
            elevation_meters: 3000.0,
            forecast_days: 16,
            timezone: "America/Denver".to_string(),
        });

        assert!(url.starts_with("http://localhost/v1/forecast?latitude=39.6&longitude=-106"));
        assert!(url.contains("timezone=America%2FDenver"));
        assert!(url.contains("temperature_unit=fahrenheit"));
        assert!(url.contains("wind_speed_unit=mph"));
        assert!(url.contains("precipitation_unit=inch"));
        assert!(url.contains("forecast_days=16"));
        for model in WeatherModel::ALL {
            assert!(url.contains(model.api_name()));
        }
    }
}
