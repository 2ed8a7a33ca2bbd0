//! Wind direction and combined wind readings

use serde::{Deserialize, Serialize};
use std::fmt;

use super::units::WindSpeed;

const SECTOR_DEGREES: f64 = 22.5;

/// 16-point compass label
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompassPoint {
    N,
    Nne,
    Ne,
    Ene,
    E,
    Ese,
    Se,
    Sse,
    S,
    Ssw,
    Sw,
    Wsw,
    W,
    Wnw,
    Nw,
    Nnw,
    #[serde(rename = "Unknown")]
    Unknown,
}

const COMPASS: [CompassPoint; 16] = [
    CompassPoint::N,
    CompassPoint::Nne,
    CompassPoint::Ne,
    CompassPoint::Ene,
    CompassPoint::E,
    CompassPoint::Ese,
    CompassPoint::Se,
    CompassPoint::Sse,
    CompassPoint::S,
    CompassPoint::Ssw,
    CompassPoint::Sw,
    CompassPoint::Wsw,
    CompassPoint::W,
    CompassPoint::Wnw,
    CompassPoint::Nw,
    CompassPoint::Nnw,
];

impl CompassPoint {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::Nne => "NNE",
            CompassPoint::Ne => "NE",
            CompassPoint::Ene => "ENE",
            CompassPoint::E => "E",
            CompassPoint::Ese => "ESE",
            CompassPoint::Se => "SE",
            CompassPoint::Sse => "SSE",
            CompassPoint::S => "S",
            CompassPoint::Ssw => "SSW",
            CompassPoint::Sw => "SW",
            CompassPoint::Wsw => "WSW",
            CompassPoint::W => "W",
            CompassPoint::Wnw => "WNW",
            CompassPoint::Nw => "NW",
            CompassPoint::Nnw => "NNW",
            CompassPoint::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Direction the wind blows from
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct WindDirection {
    degrees: f64,
    cardinal: CompassPoint,
}

impl WindDirection {
    /// Degrees outside `[0, 360)` (including NaN) yield degrees `-1` and `Unknown`.
    #[must_use]
    pub fn new(degrees: f64) -> Self {
        if !(0.0..360.0).contains(&degrees) {
            return Self::unknown();
        }

        // Half a sector is added so the division rounds to the nearest point.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let sector = ((degrees / SECTOR_DEGREES) + 0.5) as usize % COMPASS.len();
        Self {
            degrees,
            cardinal: COMPASS[sector],
        }
    }

    #[must_use]
    pub fn unknown() -> Self {
        Self {
            degrees: -1.0,
            cardinal: CompassPoint::Unknown,
        }
    }

    #[must_use]
    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    #[must_use]
    pub fn cardinal(&self) -> CompassPoint {
        self.cardinal
    }
}

/// Wind speed, optional gusts and direction for one model at one time
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Wind {
    pub speed: WindSpeed,
    /// `None` for models that do not publish gusts
    pub gusts: Option<WindSpeed>,
    pub direction: WindDirection,
}

impl Wind {
    #[must_use]
    pub fn from_mph(speed_mph: f64, gusts_mph: Option<f64>, direction_degrees: f64) -> Self {
        Self {
            speed: WindSpeed::from_mph(speed_mph),
            gusts: gusts_mph.map(WindSpeed::from_mph),
            direction: WindDirection::new(direction_degrees),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "N")]
    #[case(11.24, "N")]
    #[case(11.25, "NNE")]
    #[case(45.0, "NE")]
    #[case(90.0, "E")]
    #[case(180.0, "S")]
    #[case(202.5, "SSW")]
    #[case(270.0, "W")]
    #[case(348.74, "NNW")]
    #[case(348.75, "N")]
    #[case(359.9, "N")]
    fn test_compass_sectors(#[case] degrees: f64, #[case] label: &str) {
        let direction = WindDirection::new(degrees);
        assert_eq!(direction.cardinal().label(), label);
        assert_eq!(direction.degrees(), degrees);
    }

    #[rstest]
    #[case(-0.1)]
    #[case(360.0)]
    #[case(725.0)]
    #[case(f64::NAN)]
    fn test_out_of_range_is_unknown(#[case] degrees: f64) {
        let direction = WindDirection::new(degrees);
        assert_eq!(direction.degrees(), -1.0);
        assert_eq!(direction.cardinal(), CompassPoint::Unknown);
        assert_eq!(direction.cardinal().to_string(), "Unknown");
    }

    #[test]
    fn test_every_in_range_degree_has_a_compass_label() {
        for tenth in 0..3600 {
            let direction = WindDirection::new(f64::from(tenth) / 10.0);
            assert_ne!(direction.cardinal(), CompassPoint::Unknown);
        }
    }

    #[test]
    fn test_wind_without_gusts() {
        let wind = Wind::from_mph(10.0, None, 90.0);
        assert!(wind.gusts.is_none());
        assert_eq!(wind.speed.mph(), 10.0);
        assert_eq!(wind.direction.cardinal(), CompassPoint::E);
    }

    #[test]
    fn test_cardinal_serializes_as_label() {
        let json = serde_json::to_value(WindDirection::new(22.5)).unwrap();
        assert_eq!(json["cardinal"], "NNE");
        let json = serde_json::to_value(WindDirection::unknown()).unwrap();
        assert_eq!(json["cardinal"], "Unknown");
    }
}
