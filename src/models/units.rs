//! Measurement value types
//!
//! Each type is built from a single imperial reading, which is what the
//! forecast provider is asked to return, and derives its metric counterpart
//! once at construction.

use serde::{Deserialize, Serialize};

pub const INCHES_TO_MILLIMETERS: f64 = 25.4;
pub const MPH_TO_KPH: f64 = 1.60934;
pub const FEET_TO_METERS: f64 = 0.3048;

/// Air temperature
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Temperature {
    fahrenheit: f64,
    celsius: f64,
}

impl Temperature {
    #[must_use]
    pub fn from_fahrenheit(fahrenheit: f64) -> Self {
        Self {
            fahrenheit,
            celsius: (fahrenheit - 32.0) * 5.0 / 9.0,
        }
    }

    #[must_use]
    pub fn fahrenheit(&self) -> f64 {
        self.fahrenheit
    }

    #[must_use]
    pub fn celsius(&self) -> f64 {
        self.celsius
    }
}

/// Precipitation amount (rain, showers, snowfall or total)
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Precipitation {
    inches: f64,
    millimeters: f64,
}

impl Precipitation {
    #[must_use]
    pub fn from_inches(inches: f64) -> Self {
        Self {
            inches,
            millimeters: inches * INCHES_TO_MILLIMETERS,
        }
    }

    #[must_use]
    pub fn inches(&self) -> f64 {
        self.inches
    }

    #[must_use]
    pub fn millimeters(&self) -> f64 {
        self.millimeters
    }
}

/// Wind or gust speed
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct WindSpeed {
    mph: f64,
    kph: f64,
}

impl WindSpeed {
    #[must_use]
    pub fn from_mph(mph: f64) -> Self {
        Self {
            mph,
            kph: mph * MPH_TO_KPH,
        }
    }

    #[must_use]
    pub fn mph(&self) -> f64 {
        self.mph
    }

    #[must_use]
    pub fn kph(&self) -> f64 {
        self.kph
    }
}

/// Height above sea level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Elevation {
    feet: f64,
    meters: f64,
}

impl Elevation {
    #[must_use]
    pub fn from_feet(feet: f64) -> Self {
        Self {
            feet,
            meters: feet * FEET_TO_METERS,
        }
    }

    /// Build from a metric reading; feet remain the stored base unit.
    #[must_use]
    pub fn from_meters(meters: f64) -> Self {
        Self::from_feet(meters / FEET_TO_METERS)
    }

    #[must_use]
    pub fn feet(&self) -> f64 {
        self.feet
    }

    #[must_use]
    pub fn meters(&self) -> f64 {
        self.meters
    }
}

/// Depth of snow on the ground
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct SnowDepth {
    feet: f64,
    meters: f64,
}

impl SnowDepth {
    #[must_use]
    pub fn from_feet(feet: f64) -> Self {
        Self {
            feet,
            meters: feet * FEET_TO_METERS,
        }
    }

    #[must_use]
    pub fn feet(&self) -> f64 {
        self.feet
    }

    #[must_use]
    pub fn meters(&self) -> f64 {
        self.meters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(32.0, 0.0)]
    #[case(212.0, 100.0)]
    #[case(-40.0, -40.0)]
    fn test_temperature_conversion(#[case] fahrenheit: f64, #[case] celsius: f64) {
        let temperature = Temperature::from_fahrenheit(fahrenheit);
        assert_eq!(temperature.fahrenheit(), fahrenheit);
        assert!((temperature.celsius() - celsius).abs() < 1e-9);
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.37)]
    #[case(12.5)]
    fn test_base_unit_is_preserved(#[case] value: f64) {
        assert_eq!(Precipitation::from_inches(value).inches(), value);
        assert_eq!(Precipitation::from_inches(value).millimeters(), value * INCHES_TO_MILLIMETERS);
        assert_eq!(WindSpeed::from_mph(value).mph(), value);
        assert_eq!(WindSpeed::from_mph(value).kph(), value * MPH_TO_KPH);
        assert_eq!(Elevation::from_feet(value).feet(), value);
        assert_eq!(Elevation::from_feet(value).meters(), value * FEET_TO_METERS);
        assert_eq!(SnowDepth::from_feet(value).feet(), value);
        assert_eq!(SnowDepth::from_feet(value).meters(), value * FEET_TO_METERS);
    }

    #[test]
    fn test_elevation_from_meters() {
        let elevation = Elevation::from_meters(3048.0);
        assert!((elevation.feet() - 10_000.0).abs() < 1e-6);
        assert!((elevation.meters() - 3048.0).abs() < 1e-6);
    }

    #[test]
    fn test_serializes_both_units() {
        let json = serde_json::to_value(WindSpeed::from_mph(10.0)).unwrap();
        assert_eq!(json["mph"], 10.0);
        assert!((json["kph"].as_f64().unwrap() - 16.0934).abs() < 1e-9);
    }
}
