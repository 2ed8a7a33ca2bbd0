//! Configuration management for `medi-snow`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::MediSnowError;
use crate::models::WeatherModel;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Longest horizon the forecast provider serves
pub const MAX_FORECAST_DAYS: u32 = 16;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MediSnowConfig {
    /// Upstream provider endpoints and HTTP settings
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Forecast assembly settings
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Upstream provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_open_meteo_url")]
    pub open_meteo_url: String,
    #[serde(default = "default_usgs_url")]
    pub usgs_url: String,
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,
    #[serde(default = "default_avalanche_url")]
    pub avalanche_url: String,
    #[serde(default = "default_nws_url")]
    pub nws_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// User agent sent upstream; Nominatim and NWS reject anonymous clients
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Forecast settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Number of days requested from the provider
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
    /// Model highlighted to callers
    #[serde(default = "default_primary_model")]
    pub primary_model: String,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache directory location
    #[serde(default = "default_cache_location")]
    pub location: String,
    /// TTL of the avalanche zone map in hours
    #[serde(default = "default_map_layer_ttl")]
    pub map_layer_ttl_hours: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_open_meteo_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_usgs_url() -> String {
    "https://epqs.nationalmap.gov/v1".to_string()
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_avalanche_url() -> String {
    "https://api.avalanche.org".to_string()
}

fn default_nws_url() -> String {
    "https://api.weather.gov".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("medi-snow/{}", crate::VERSION)
}

fn default_forecast_days() -> u32 {
    MAX_FORECAST_DAYS
}

fn default_primary_model() -> String {
    WeatherModel::GfsSeamless.id().to_string()
}

fn default_cache_location() -> String {
    dirs::cache_dir()
        .map(|dir| dir.join("medi-snow").to_string_lossy().into_owned())
        .unwrap_or_else(|| ".cache/medi-snow".to_string())
}

fn default_map_layer_ttl() -> u32 {
    24
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            open_meteo_url: default_open_meteo_url(),
            usgs_url: default_usgs_url(),
            nominatim_url: default_nominatim_url(),
            avalanche_url: default_avalanche_url(),
            nws_url: default_nws_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            forecast_days: default_forecast_days(),
            primary_model: default_primary_model(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            location: default_cache_location(),
            map_layer_ttl_hours: default_map_layer_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ForecastConfig {
    /// Parsed primary model; only valid after [`MediSnowConfig::validate`]
    pub fn primary_model(&self) -> crate::Result<WeatherModel> {
        self.primary_model.parse()
    }
}

impl MediSnowConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // MEDI_SNOW_PROVIDERS__TIMEOUT_SECONDS=10 overrides providers.timeout_seconds
        builder = builder.add_source(
            Environment::with_prefix("MEDI_SNOW")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: MediSnowConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("medi-snow").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        let providers = &mut self.providers;
        for (url, default) in [
            (&mut providers.open_meteo_url, default_open_meteo_url as fn() -> String),
            (&mut providers.usgs_url, default_usgs_url),
            (&mut providers.nominatim_url, default_nominatim_url),
            (&mut providers.avalanche_url, default_avalanche_url),
            (&mut providers.nws_url, default_nws_url),
        ] {
            if url.is_empty() {
                *url = default();
            }
        }
        if providers.timeout_seconds == 0 {
            providers.timeout_seconds = default_timeout();
        }
        if providers.user_agent.is_empty() {
            providers.user_agent = default_user_agent();
        }
        if self.forecast.forecast_days == 0 {
            self.forecast.forecast_days = default_forecast_days();
        }
        if self.forecast.primary_model.is_empty() {
            self.forecast.primary_model = default_primary_model();
        }
        if self.cache.location.is_empty() {
            self.cache.location = default_cache_location();
        }
        if self.cache.map_layer_ttl_hours == 0 {
            self.cache.map_layer_ttl_hours = default_map_layer_ttl();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.providers.timeout_seconds > 300 {
            return Err(
                MediSnowError::config("Provider timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.forecast.forecast_days == 0 || self.forecast.forecast_days > MAX_FORECAST_DAYS {
            return Err(MediSnowError::config(format!(
                "Forecast days must be between 1 and {MAX_FORECAST_DAYS}"
            ))
            .into());
        }

        if self.cache.map_layer_ttl_hours > 168 {
            return Err(
                MediSnowError::config("Map layer TTL cannot exceed 168 hours (1 week)").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(MediSnowError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(MediSnowError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("open_meteo_url", &self.providers.open_meteo_url),
            ("usgs_url", &self.providers.usgs_url),
            ("nominatim_url", &self.providers.nominatim_url),
            ("avalanche_url", &self.providers.avalanche_url),
            ("nws_url", &self.providers.nws_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(MediSnowError::config(format!(
                    "Provider URL {name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.providers.user_agent.trim().is_empty() {
            return Err(MediSnowError::config("User agent cannot be empty").into());
        }

        if self.forecast.primary_model().is_err() {
            return Err(MediSnowError::config(format!(
                "Unknown primary model '{}'",
                self.forecast.primary_model
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = MediSnowConfig::default();
        assert_eq!(config.providers.open_meteo_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.providers.timeout_seconds, 30);
        assert_eq!(config.forecast.forecast_days, 16);
        assert_eq!(
            config.forecast.primary_model().unwrap(),
            WeatherModel::GfsSeamless
        );
        assert_eq!(config.cache.map_layer_ttl_hours, 24);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = MediSnowConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_forecast_days() {
        let mut config = MediSnowConfig::default();
        config.forecast.forecast_days = 17;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Forecast days"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = MediSnowConfig::default();
        config.providers.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_unknown_model() {
        let mut config = MediSnowConfig::default();
        config.forecast.primary_model = "icon_seamless".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_url() {
        let mut config = MediSnowConfig::default();
        config.providers.avalanche_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("avalanche_url"));
    }

    #[test]
    fn test_apply_defaults_fills_empty_values() {
        let mut config = MediSnowConfig::default();
        config.providers.nws_url.clear();
        config.forecast.forecast_days = 0;
        config.logging.format.clear();

        config.apply_defaults();

        assert_eq!(config.providers.nws_url, "https://api.weather.gov");
        assert_eq!(config.forecast.forecast_days, 16);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[forecast]\nforecast_days = 7\nprimary_model = \"ecmwf_ifs\"\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = MediSnowConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.forecast.forecast_days, 7);
        assert_eq!(config.forecast.primary_model().unwrap(), WeatherModel::EcmwfIfs);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.providers.timeout_seconds, 30);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = MediSnowConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("medi-snow"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
