//! Avalanche forecast models, independent of the publishing provider

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AvalancheForecast {
    pub zone: ForecastZone,
    pub center: AvalancheCenter,
    pub published_time: Option<DateTime<Utc>>,
    pub expires_time: Option<DateTime<Utc>>,
    pub author: String,
    /// HTML summary
    pub bottom_line: String,
    /// HTML discussion
    pub hazard_discussion: String,
    pub danger_ratings: Vec<DangerRating>,
    pub problems: Vec<AvalancheProblem>,
    /// Link to the center's page for this zone
    pub forecast_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastZone {
    pub id: i64,
    pub name: String,
    pub state: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AvalancheCenter {
    /// Short code such as `CAIC` or `BTAC`
    pub id: String,
    pub name: String,
    pub url: String,
    pub city: String,
    pub state: String,
}

/// North American Avalanche Danger Scale
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(into = "u8", from = "u8")]
pub enum DangerLevel {
    #[default]
    NoRating = 0,
    Low = 1,
    Moderate = 2,
    Considerable = 3,
    High = 4,
    Extreme = 5,
}

impl DangerLevel {
    /// Values outside 0-5 are treated as unrated
    #[must_use]
    pub fn from_level(level: i64) -> Self {
        match level {
            1 => DangerLevel::Low,
            2 => DangerLevel::Moderate,
            3 => DangerLevel::Considerable,
            4 => DangerLevel::High,
            5 => DangerLevel::Extreme,
            _ => DangerLevel::NoRating,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            DangerLevel::NoRating => "No Rating",
            DangerLevel::Low => "Low",
            DangerLevel::Moderate => "Moderate",
            DangerLevel::Considerable => "Considerable",
            DangerLevel::High => "High",
            DangerLevel::Extreme => "Extreme",
        }
    }
}

impl From<u8> for DangerLevel {
    fn from(level: u8) -> Self {
        Self::from_level(i64::from(level))
    }
}

impl From<DangerLevel> for u8 {
    fn from(level: DangerLevel) -> Self {
        level as u8
    }
}

impl fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Danger by elevation band for one validity day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DangerRating {
    /// Provider label, e.g. `current` or `tomorrow`
    pub valid_day: String,
    pub lower: DangerLevel,
    pub middle: DangerLevel,
    pub upper: DangerLevel,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AvalancheProblem {
    pub name: String,
    /// 1 is the primary problem
    pub rank: i64,
    pub likelihood: Likelihood,
    /// HTML
    pub discussion: String,
    /// Aspect and elevation combinations such as `north upper`
    pub location: Vec<String>,
    pub size: AvalancheSize,
    pub media_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(into = "u8", from = "u8")]
pub enum Likelihood {
    #[default]
    Unknown = 0,
    Unlikely = 1,
    Possible = 2,
    Likely = 3,
    VeryLikely = 4,
    AlmostCertain = 5,
}

impl Likelihood {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Likelihood::Unknown => "Unknown",
            Likelihood::Unlikely => "Unlikely",
            Likelihood::Possible => "Possible",
            Likelihood::Likely => "Likely",
            Likelihood::VeryLikely => "Very Likely",
            Likelihood::AlmostCertain => "Almost Certain",
        }
    }
}

impl From<u8> for Likelihood {
    fn from(value: u8) -> Self {
        match value {
            1 => Likelihood::Unlikely,
            2 => Likelihood::Possible,
            3 => Likelihood::Likely,
            4 => Likelihood::VeryLikely,
            5 => Likelihood::AlmostCertain,
            _ => Likelihood::Unknown,
        }
    }
}

impl From<Likelihood> for u8 {
    fn from(likelihood: Likelihood) -> Self {
        likelihood as u8
    }
}

impl fmt::Display for Likelihood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Destructive size range of a problem
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct AvalancheSize {
    pub min: f64,
    pub max: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, DangerLevel::NoRating, "No Rating")]
    #[case(1, DangerLevel::Low, "Low")]
    #[case(3, DangerLevel::Considerable, "Considerable")]
    #[case(5, DangerLevel::Extreme, "Extreme")]
    #[case(-1, DangerLevel::NoRating, "No Rating")]
    #[case(9, DangerLevel::NoRating, "No Rating")]
    fn test_danger_level_from_int(
        #[case] level: i64,
        #[case] expected: DangerLevel,
        #[case] name: &str,
    ) {
        let danger = DangerLevel::from_level(level);
        assert_eq!(danger, expected);
        assert_eq!(danger.to_string(), name);
    }

    #[test]
    fn test_enums_serialize_as_integers() {
        assert_eq!(serde_json::to_value(DangerLevel::High).unwrap(), 4);
        assert_eq!(serde_json::to_value(Likelihood::VeryLikely).unwrap(), 4);
        let level: DangerLevel = serde_json::from_value(serde_json::json!(2)).unwrap();
        assert_eq!(level, DangerLevel::Moderate);
    }
}
