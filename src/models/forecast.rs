//! Multi-model forecast models
//!
//! A [`Forecast`] is a snapshot of current conditions plus one
//! [`DailyForecast`] per provider day, each holding its hourly slices and the
//! per-model daily statistics computed from them.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::location::ForecastPoint;
use super::model_values::{ModelValues, WeatherModel};
use super::units::{Elevation, Precipitation, SnowDepth, Temperature, WindSpeed};
use super::weather::Weather;
use super::wind::{Wind, WindDirection};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Forecast {
    /// When the forecast was assembled
    pub timestamp: DateTime<Utc>,
    pub forecast_point: ForecastPoint,
    /// IANA timezone all local times were interpreted in
    pub timezone: String,
    pub primary_model: WeatherModel,
    pub current_conditions: CurrentConditions,
    pub daily_forecasts: Vec<DailyForecast>,
}

/// Conditions sampled at the hourly slot closest to, and not after, now
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CurrentConditions {
    pub temperature: ModelValues<Temperature>,
    pub weather: ModelValues<Weather>,
    pub wind: ModelValues<Wind>,
    pub visibility: ModelValues<f64>,
    /// Fractions in `[0, 1]`
    pub cloud_cover: ModelValues<f64>,
    pub cloud_cover_low: ModelValues<f64>,
    pub cloud_cover_mid: ModelValues<f64>,
    pub cloud_cover_high: ModelValues<f64>,
    pub relative_humidity: ModelValues<f64>,
}

/// One calendar day in the forecast timezone
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// Hours of this day in chronological order
    pub hourly_forecasts: Vec<HourlyForecast>,

    pub snowfall_water_equivalent_sum: ModelValues<Precipitation>,
    pub weather: ModelValues<Weather>,
    pub sunrise: ModelValues<DateTime<FixedOffset>>,
    pub sunset: ModelValues<DateTime<FixedOffset>>,
    pub wind_dominant_direction: ModelValues<WindDirection>,

    pub highest_freezing_level_height: ModelValues<Elevation>,
    pub lowest_freezing_level_height: ModelValues<Elevation>,
    pub high_temperature: ModelValues<Temperature>,
    pub low_temperature: ModelValues<Temperature>,
    pub max_wind_speed: ModelValues<WindSpeed>,
    pub min_wind_speed: ModelValues<WindSpeed>,
    pub max_wind_gusts: ModelValues<WindSpeed>,
    pub min_wind_gusts: ModelValues<WindSpeed>,
    pub total_rain: ModelValues<Precipitation>,
    pub total_showers: ModelValues<Precipitation>,
    pub total_snowfall: ModelValues<Precipitation>,
    pub total_precipitation: ModelValues<Precipitation>,
    /// Rain plus showers, for models that publish both
    pub total_liquid_precipitation: ModelValues<Precipitation>,
}

/// One hour of the forecast, `end` is always `start` plus one hour
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HourlyForecast {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub freezing_level_height: ModelValues<Elevation>,
    pub is_day: ModelValues<bool>,
    pub weather: ModelValues<Weather>,
    pub temperature: ModelValues<Temperature>,
    pub apparent_temperature: ModelValues<Temperature>,
    /// Fraction in `[0, 1]`
    pub precipitation_probability: ModelValues<f64>,
    pub precipitation: ModelValues<Precipitation>,
    pub cloud_cover: ModelValues<f64>,
    pub cloud_cover_low: ModelValues<f64>,
    pub cloud_cover_mid: ModelValues<f64>,
    pub cloud_cover_high: ModelValues<f64>,
    /// Provider length unit (feet for imperial requests)
    pub visibility: ModelValues<f64>,
    pub wind: ModelValues<Wind>,
    pub relative_humidity: ModelValues<f64>,
    pub rain: ModelValues<Precipitation>,
    pub showers: ModelValues<Precipitation>,
    pub snowfall: ModelValues<Precipitation>,
    pub snow_depth: ModelValues<SnowDepth>,
    pub liquid_precipitation: ModelValues<Precipitation>,
}
