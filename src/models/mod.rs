//! Domain models for medi-snow
//!
//! - Units: measurement value types in imperial and metric
//! - Wind / Weather: direction, compass labels and WMO codes
//! - Model values: sparse per-model maps
//! - Location / Forecast / Avalanche: the objects returned to callers

pub mod avalanche;
pub mod forecast;
pub mod location;
pub mod model_values;
pub mod units;
pub mod weather;
pub mod wind;

// Re-export all public types for convenient access
pub use avalanche::{
    AvalancheCenter, AvalancheForecast, AvalancheProblem, AvalancheSize, DangerLevel,
    DangerRating, ForecastZone, Likelihood,
};
pub use forecast::{CurrentConditions, DailyForecast, Forecast, HourlyForecast};
pub use location::{Coordinates, ForecastPoint, LocationInfo};
pub use model_values::{ModelValues, WeatherModel};
pub use units::{Elevation, Precipitation, SnowDepth, Temperature, WindSpeed};
pub use weather::Weather;
pub use wind::{CompassPoint, Wind, WindDirection};
