//! Multi-model weather forecasting
//!
//! [`WeatherService`] resolves the point's timezone, fetches the raw
//! multi-model payload and hands it to [`assemble`]. Alignment and
//! aggregation are pure and live in their own modules.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

pub mod aggregate;
pub mod assemble;
pub mod nws;
pub mod open_meteo;
pub mod timeline;

pub use assemble::assemble;
pub use open_meteo::{ForecastRequest, ForecastResponse, OpenMeteoClient};

use crate::config::{ForecastConfig, MediSnowConfig};
use crate::models::{Forecast, ForecastPoint, WeatherModel};
use crate::timezone::TimezoneResolver;
use crate::Result;

/// Source of raw multi-model forecasts
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn get_forecast(&self, request: &ForecastRequest) -> Result<ForecastResponse>;
}

/// Source of forecaster-written discussion text
#[async_trait]
pub trait ForecastDiscussionProvider: Send + Sync {
    /// Forecast office responsible for a point
    async fn forecast_office(&self, latitude: f64, longitude: f64) -> Result<String>;
    /// Latest discussion product issued by `office`
    async fn area_forecast_discussion(&self, office: &str) -> Result<String>;
}

pub struct WeatherService {
    forecast_provider: Arc<dyn ForecastProvider>,
    discussion_provider: Arc<dyn ForecastDiscussionProvider>,
    timezone_resolver: Arc<dyn TimezoneResolver>,
    forecast_days: u32,
    primary_model: WeatherModel,
}

impl WeatherService {
    pub fn new(
        forecast_provider: Arc<dyn ForecastProvider>,
        discussion_provider: Arc<dyn ForecastDiscussionProvider>,
        timezone_resolver: Arc<dyn TimezoneResolver>,
        config: &ForecastConfig,
    ) -> Result<Self> {
        Ok(Self {
            forecast_provider,
            discussion_provider,
            timezone_resolver,
            forecast_days: config.forecast_days,
            primary_model: config.primary_model()?,
        })
    }

    /// Service wired to the Open-Meteo and NWS clients
    pub fn from_config(config: &MediSnowConfig, timezone_resolver: Arc<dyn TimezoneResolver>) -> Result<Self> {
        Self::new(
            Arc::new(OpenMeteoClient::new(&config.providers)?),
            Arc::new(nws::NwsClient::new(&config.providers)?),
            timezone_resolver,
            &config.forecast,
        )
    }

    /// Forecast for `point` as of now
    pub async fn get_forecast(&self, point: &ForecastPoint) -> Result<Forecast> {
        self.get_forecast_at(point, Utc::now()).await
    }

    /// Forecast for `point` with "now" pinned to `now`
    #[tracing::instrument(name = "get_forecast", skip(self, point), fields(
        latitude = point.coordinates.latitude(),
        longitude = point.coordinates.longitude(),
    ))]
    pub async fn get_forecast_at(&self, point: &ForecastPoint, now: DateTime<Utc>) -> Result<Forecast> {
        let timezone = self.timezone_resolver.timezone_for(&point.coordinates).inspect_err(|e| {
            error!(error = %e, "Failed to determine timezone");
        })?;

        let request = ForecastRequest {
            latitude: point.coordinates.latitude(),
            longitude: point.coordinates.longitude(),
            elevation_meters: point.elevation.meters(),
            forecast_days: self.forecast_days,
            timezone: timezone.clone(),
        };
        let response = self.forecast_provider.get_forecast(&request).await.inspect_err(|e| {
            error!(error = %e, "Failed to get forecast from provider");
        })?;

        // Local times in the payload are expressed in the timezone the provider used
        let effective_timezone = if response.timezone.is_empty() {
            timezone
        } else {
            if response.timezone != timezone {
                warn!(
                    requested = %timezone,
                    returned = %response.timezone,
                    "Provider answered in a different timezone"
                );
            }
            response.timezone.clone()
        };

        let forecast = assemble(point.clone(), &effective_timezone, self.primary_model, &response, now)?;
        info!(
            days = forecast.daily_forecasts.len(),
            timezone = %forecast.timezone,
            "Assembled forecast"
        );
        Ok(forecast)
    }

    /// Latest area forecast discussion for the office covering `point`
    #[tracing::instrument(name = "get_forecast_discussion", skip(self, point))]
    pub async fn get_forecast_discussion(&self, point: &ForecastPoint) -> Result<String> {
        let office = self
            .discussion_provider
            .forecast_office(point.coordinates.latitude(), point.coordinates.longitude())
            .await
            .inspect_err(|e| error!(error = %e, "Failed to get NWS point data"))?;

        self.discussion_provider
            .area_forecast_discussion(&office)
            .await
            .inspect_err(|e| error!(office = %office, error = %e, "Failed to get area forecast discussion"))
    }
}

#[cfg(test)]
mod tests {
    use super::assemble::test_support::{hour_value, noon_utc, point, response};
    use super::*;
    use crate::MediSnowError;
    use crate::timezone::FixedTimezoneResolver;
    use std::sync::Mutex;

    struct CannedForecast {
        response: ForecastResponse,
        requests: Mutex<Vec<ForecastRequest>>,
    }

    #[async_trait]
    impl ForecastProvider for CannedForecast {
        async fn get_forecast(&self, request: &ForecastRequest) -> Result<ForecastResponse> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(self.response.clone())
        }
    }

    struct FailingForecast;

    #[async_trait]
    impl ForecastProvider for FailingForecast {
        async fn get_forecast(&self, _request: &ForecastRequest) -> Result<ForecastResponse> {
            Err(MediSnowError::api("Open-Meteo error 503"))
        }
    }

    struct CannedDiscussion;

    #[async_trait]
    impl ForecastDiscussionProvider for CannedDiscussion {
        async fn forecast_office(&self, _latitude: f64, _longitude: f64) -> Result<String> {
            Ok("BOU".to_string())
        }

        async fn area_forecast_discussion(&self, office: &str) -> Result<String> {
            Ok(format!("Area Forecast Discussion from {office}"))
        }
    }

    fn service(provider: Arc<dyn ForecastProvider>, timezone: &str) -> WeatherService {
        WeatherService::new(
            provider,
            Arc::new(CannedDiscussion),
            Arc::new(FixedTimezoneResolver(timezone.to_string())),
            &ForecastConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_forecast_requests_point_and_timezone() {
        let provider = Arc::new(CannedForecast {
            response: response(2, hour_value),
            requests: Mutex::new(Vec::new()),
        });
        let service = service(provider.clone(), "America/Denver");

        let forecast = service.get_forecast_at(&point(), noon_utc()).await.unwrap();

        assert_eq!(forecast.daily_forecasts.len(), 2);
        assert_eq!(forecast.primary_model, WeatherModel::GfsSeamless);
        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].timezone, "America/Denver");
        assert_eq!(requests[0].forecast_days, 16);
        assert!((requests[0].elevation_meters - 8150.0 * 0.3048).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_payload_timezone_wins() {
        let provider = Arc::new(CannedForecast {
            response: response(1, hour_value),
            requests: Mutex::new(Vec::new()),
        });
        let service = service(provider, "America/Boise");

        let forecast = service.get_forecast_at(&point(), noon_utc()).await.unwrap();

        assert_eq!(forecast.timezone, "America/Denver");
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let service = service(Arc::new(FailingForecast), "America/Denver");
        let result = service.get_forecast_at(&point(), noon_utc()).await;
        assert!(matches!(result, Err(MediSnowError::Api { .. })));
    }

    #[tokio::test]
    async fn test_forecast_discussion() {
        let service = service(Arc::new(FailingForecast), "America/Denver");
        let text = service.get_forecast_discussion(&point()).await.unwrap();
        assert_eq!(text, "Area Forecast Discussion from BOU");
    }
}
