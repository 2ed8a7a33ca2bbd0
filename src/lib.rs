//! `medi-snow` - Mountain weather and avalanche forecasts for a coordinate
//!
//! This library resolves a point into location metadata, a multi-model
//! weather forecast bucketed into local days and hours, and the avalanche
//! forecast for the enclosing backcountry zone.

pub mod avalanche;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod location;
pub mod logging;
pub mod models;
pub mod timezone;
pub mod weather;

// Re-export core types for public API
pub use avalanche::AvalancheService;
pub use cache::PersistentCache;
pub use config::MediSnowConfig;
pub use error::MediSnowError;
pub use location::LocationService;
pub use models::{AvalancheForecast, Forecast, ForecastPoint};
pub use timezone::{TimezoneResolver, TzfTimezoneResolver};
pub use weather::WeatherService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, MediSnowError>;
