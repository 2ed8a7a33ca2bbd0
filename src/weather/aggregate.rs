//! Daily statistics over hourly sub-series

use crate::models::{ModelValues, Precipitation};

/// Returned by [`min`] and [`max`] for an empty range. Not a measurement.
pub const EMPTY_RANGE: f64 = -1.0;

#[must_use]
pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(EMPTY_RANGE)
}

#[must_use]
pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(EMPTY_RANGE)
}

#[must_use]
pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Rain plus showers per model; models missing from either map are left out.
#[must_use]
pub fn liquid_precipitation(
    rain: &ModelValues<Precipitation>,
    showers: &ModelValues<Precipitation>,
) -> ModelValues<Precipitation> {
    rain.iter()
        .filter_map(|(&model, rain)| {
            showers
                .get(model)
                .map(|showers| (model, Precipitation::from_inches(rain.inches() + showers.inches())))
        })
        .collect()
}
