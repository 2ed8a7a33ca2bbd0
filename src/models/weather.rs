//! WMO weather interpretation codes

use serde::{Deserialize, Serialize};

/// Provider weather code with its human-readable description
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Weather {
    pub code: i32,
    pub description: String,
}

impl Weather {
    #[must_use]
    pub fn new(code: i32) -> Self {
        Self {
            code,
            description: describe(code).to_string(),
        }
    }
}

/// Description for a WMO code, `"Unknown"` for codes outside the table.
#[must_use]
pub fn describe(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Drizzle: Light intensity",
        53 => "Drizzle: Moderate intensity",
        55 => "Drizzle: Dense intensity",
        56 => "Freezing Drizzle: Light intensity",
        57 => "Freezing Drizzle: Dense intensity",
        61 => "Rainfall: Slight intensity",
        63 => "Rainfall: Moderate intensity",
        65 => "Rainfall: Heavy intensity",
        66 => "Freezing Rainfall: Light intensity",
        67 => "Freezing Rainfall: Heavy intensity",
        71 => "Snow fall: Slight intensity",
        73 => "Snow fall: Moderate intensity",
        75 => "Snow fall: Heavy intensity",
        77 => "Snow grains",
        80 => "Rainfall showers: Slight",
        81 => "Rainfall showers: Moderate",
        82 => "Rainfall showers: Violent",
        85 => "Snow showers: Slight",
        86 => "Snow showers: Heavy",
        95 => "Thunderstorm: Slight or moderate",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
