//! Forecast assembly
//!
//! Turns one raw multi-model payload into a [`Forecast`]. Every variable is
//! read only for the models known to publish it; a `null` cell leaves the
//! model out of that slot, while a listed model whose column is missing or too
//! short fails the whole assembly.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use super::aggregate;
use super::open_meteo::{ForecastResponse, SeriesBlock};
use super::timeline::{self, DayRange, Timeline};
use crate::models::{
    CurrentConditions, DailyForecast, Elevation, Forecast, ForecastPoint, HourlyForecast,
    ModelValues, Precipitation, SnowDepth, Temperature, Weather, WeatherModel, Wind, WindDirection,
    WindSpeed,
};
use crate::{MediSnowError, Result};

use WeatherModel::{
    EcmwfAifs025Single, EcmwfIfs, GemSeamless, GfsGraphcast025, GfsSeamless, NcepNamConus,
    NcepNbmConus,
};

/// Per-variable model coverage
pub mod coverage {
    use super::*;

    pub const ALL: &[WeatherModel] = &WeatherModel::ALL;
    pub const FREEZING_LEVEL: &[WeatherModel] = &[GfsSeamless];
    pub const WITHOUT_GRAPHCAST: &[WeatherModel] = &[
        GemSeamless,
        EcmwfIfs,
        GfsSeamless,
        NcepNbmConus,
        EcmwfAifs025Single,
        NcepNamConus,
    ];
    pub const CLOUD_BANDS: &[WeatherModel] = &[
        GemSeamless,
        EcmwfIfs,
        GfsSeamless,
        GfsGraphcast025,
        EcmwfAifs025Single,
        NcepNamConus,
    ];
    pub const WIND_GUSTS: &[WeatherModel] =
        &[GemSeamless, EcmwfIfs, GfsSeamless, NcepNbmConus, NcepNamConus];
    pub const PRECIPITATION_PROBABILITY: &[WeatherModel] =
        &[GfsSeamless, GemSeamless, EcmwfIfs, NcepNbmConus];
    pub const VISIBILITY: &[WeatherModel] = &[GfsSeamless, EcmwfIfs, NcepNbmConus, NcepNamConus];
    pub const SNOW_DEPTH: &[WeatherModel] = &[GfsSeamless, GemSeamless, EcmwfIfs, NcepNamConus];
}

mod var {
    pub const FREEZING_LEVEL: &str = "freezing_level_height";
    pub const IS_DAY: &str = "is_day";
    pub const TEMPERATURE: &str = "temperature_2m";
    pub const WEATHER_CODE: &str = "weather_code";
    pub const APPARENT_TEMPERATURE: &str = "apparent_temperature";
    pub const PRECIPITATION_PROBABILITY: &str = "precipitation_probability";
    pub const PRECIPITATION: &str = "precipitation";
    pub const CLOUD_COVER: &str = "cloud_cover";
    pub const CLOUD_COVER_LOW: &str = "cloud_cover_low";
    pub const CLOUD_COVER_MID: &str = "cloud_cover_mid";
    pub const CLOUD_COVER_HIGH: &str = "cloud_cover_high";
    pub const VISIBILITY: &str = "visibility";
    pub const WIND_SPEED: &str = "wind_speed_10m";
    pub const WIND_DIRECTION: &str = "wind_direction_10m";
    pub const WIND_GUSTS: &str = "wind_gusts_10m";
    pub const RELATIVE_HUMIDITY: &str = "relative_humidity_2m";
    pub const RAIN: &str = "rain";
    pub const SHOWERS: &str = "showers";
    pub const SNOWFALL: &str = "snowfall";
    pub const SNOW_DEPTH: &str = "snow_depth";

    pub const SNOWFALL_WATER_EQUIVALENT_SUM: &str = "snowfall_water_equivalent_sum";
    pub const SUNRISE: &str = "sunrise";
    pub const SUNSET: &str = "sunset";
    pub const WIND_DIRECTION_DOMINANT: &str = "wind_direction_10m_dominant";
}

/// Assemble a forecast for `point` from `response`, with local times read in
/// `timezone` and "now" taken as `now`.
pub fn assemble(
    point: ForecastPoint,
    timezone: &str,
    primary_model: WeatherModel,
    response: &ForecastResponse,
    now: DateTime<Utc>,
) -> Result<Forecast> {
    let timeline = Timeline::align(&response.hourly.time, &response.daily.time, timezone, now)?;
    if response.hourly.time.is_empty() {
        return Err(MediSnowError::malformed("hourly series is empty"));
    }

    let current_index = timeline.current_index();
    debug!(current_index, timezone, "Aligned forecast timeline");

    let current_conditions = current_conditions(&response.hourly, current_index)?;

    let daily_forecasts = timeline
        .days()
        .iter()
        .map(|day| daily_forecast(response, &timeline, day))
        .collect::<Result<Vec<_>>>()?;

    Ok(Forecast {
        timestamp: now,
        forecast_point: point,
        timezone: timezone.to_string(),
        primary_model,
        current_conditions,
        daily_forecasts,
    })
}

fn current_conditions(hourly: &SeriesBlock, index: usize) -> Result<CurrentConditions> {
    Ok(CurrentConditions {
        temperature: collect(hourly, var::TEMPERATURE, coverage::ALL, index, Temperature::from_fahrenheit)?,
        weather: collect(hourly, var::WEATHER_CODE, coverage::ALL, index, weather_from)?,
        wind: wind_at(hourly, index)?,
        visibility: collect(hourly, var::VISIBILITY, coverage::VISIBILITY, index, identity)?,
        cloud_cover: collect(hourly, var::CLOUD_COVER, coverage::ALL, index, fraction)?,
        cloud_cover_low: collect(hourly, var::CLOUD_COVER_LOW, coverage::CLOUD_BANDS, index, fraction)?,
        cloud_cover_mid: collect(hourly, var::CLOUD_COVER_MID, coverage::CLOUD_BANDS, index, fraction)?,
        cloud_cover_high: collect(hourly, var::CLOUD_COVER_HIGH, coverage::CLOUD_BANDS, index, fraction)?,
        relative_humidity: collect(
            hourly,
            var::RELATIVE_HUMIDITY,
            coverage::WITHOUT_GRAPHCAST,
            index,
            fraction,
        )?,
    })
}

fn hourly_forecast(
    hourly: &SeriesBlock,
    start: DateTime<chrono::FixedOffset>,
    index: usize,
) -> Result<HourlyForecast> {
    let rain = collect(hourly, var::RAIN, coverage::ALL, index, Precipitation::from_inches)?;
    let showers = collect(hourly, var::SHOWERS, coverage::ALL, index, Precipitation::from_inches)?;
    let liquid_precipitation = aggregate::liquid_precipitation(&rain, &showers);

    Ok(HourlyForecast {
        start,
        end: start + Duration::hours(1),
        freezing_level_height: collect(
            hourly,
            var::FREEZING_LEVEL,
            coverage::FREEZING_LEVEL,
            index,
            Elevation::from_feet,
        )?,
        is_day: collect(hourly, var::IS_DAY, coverage::ALL, index, |raw| raw > 0.5)?,
        weather: collect(hourly, var::WEATHER_CODE, coverage::ALL, index, weather_from)?,
        temperature: collect(hourly, var::TEMPERATURE, coverage::ALL, index, Temperature::from_fahrenheit)?,
        apparent_temperature: collect(
            hourly,
            var::APPARENT_TEMPERATURE,
            coverage::WITHOUT_GRAPHCAST,
            index,
            Temperature::from_fahrenheit,
        )?,
        precipitation_probability: collect(
            hourly,
            var::PRECIPITATION_PROBABILITY,
            coverage::PRECIPITATION_PROBABILITY,
            index,
            fraction,
        )?,
        precipitation: collect(hourly, var::PRECIPITATION, coverage::ALL, index, Precipitation::from_inches)?,
        cloud_cover: collect(hourly, var::CLOUD_COVER, coverage::ALL, index, fraction)?,
        cloud_cover_low: collect(hourly, var::CLOUD_COVER_LOW, coverage::CLOUD_BANDS, index, fraction)?,
        cloud_cover_mid: collect(hourly, var::CLOUD_COVER_MID, coverage::CLOUD_BANDS, index, fraction)?,
        cloud_cover_high: collect(hourly, var::CLOUD_COVER_HIGH, coverage::CLOUD_BANDS, index, fraction)?,
        visibility: collect(hourly, var::VISIBILITY, coverage::VISIBILITY, index, identity)?,
        wind: wind_at(hourly, index)?,
        relative_humidity: collect(
            hourly,
            var::RELATIVE_HUMIDITY,
            coverage::WITHOUT_GRAPHCAST,
            index,
            fraction,
        )?,
        rain,
        showers,
        snowfall: collect(hourly, var::SNOWFALL, coverage::ALL, index, Precipitation::from_inches)?,
        snow_depth: collect(hourly, var::SNOW_DEPTH, coverage::SNOW_DEPTH, index, SnowDepth::from_feet)?,
        liquid_precipitation,
    })
}

fn daily_forecast(response: &ForecastResponse, timeline: &Timeline, day: &DayRange) -> Result<DailyForecast> {
    let hourly = &response.hourly;
    let daily = &response.daily;
    let index = day.daily_index;
    let slots = timeline.valid_slots(&day.hours);

    let hourly_forecasts = slots
        .iter()
        .filter_map(|&slot| timeline.hour(slot).map(|start| (slot, start)))
        .map(|(slot, start)| hourly_forecast(hourly, start, slot))
        .collect::<Result<Vec<_>>>()?;

    let total_rain = reduce(hourly, var::RAIN, coverage::ALL, &slots, aggregate::sum, Precipitation::from_inches)?;
    let total_showers =
        reduce(hourly, var::SHOWERS, coverage::ALL, &slots, aggregate::sum, Precipitation::from_inches)?;
    let total_liquid_precipitation = aggregate::liquid_precipitation(&total_rain, &total_showers);

    let tz = timeline.timezone();
    let local_instant = |raw: &str| timeline::parse_local(raw, tz, None).map(|t| t.fixed_offset());

    Ok(DailyForecast {
        date: day.date,
        hourly_forecasts,
        snowfall_water_equivalent_sum: collect(
            daily,
            var::SNOWFALL_WATER_EQUIVALENT_SUM,
            coverage::WITHOUT_GRAPHCAST,
            index,
            Precipitation::from_inches,
        )?,
        weather: collect(daily, var::WEATHER_CODE, coverage::ALL, index, weather_from)?,
        sunrise: collect_text(daily, var::SUNRISE, coverage::ALL, index, local_instant)?,
        sunset: collect_text(daily, var::SUNSET, coverage::ALL, index, local_instant)?,
        wind_dominant_direction: collect(
            daily,
            var::WIND_DIRECTION_DOMINANT,
            coverage::WITHOUT_GRAPHCAST,
            index,
            WindDirection::new,
        )?,
        highest_freezing_level_height: reduce(
            hourly,
            var::FREEZING_LEVEL,
            coverage::FREEZING_LEVEL,
            &slots,
            aggregate::max,
            Elevation::from_feet,
        )?,
        lowest_freezing_level_height: reduce(
            hourly,
            var::FREEZING_LEVEL,
            coverage::FREEZING_LEVEL,
            &slots,
            aggregate::min,
            Elevation::from_feet,
        )?,
        high_temperature: reduce(
            hourly,
            var::TEMPERATURE,
            coverage::ALL,
            &slots,
            aggregate::max,
            Temperature::from_fahrenheit,
        )?,
        low_temperature: reduce(
            hourly,
            var::TEMPERATURE,
            coverage::ALL,
            &slots,
            aggregate::min,
            Temperature::from_fahrenheit,
        )?,
        max_wind_speed: reduce(hourly, var::WIND_SPEED, coverage::ALL, &slots, aggregate::max, WindSpeed::from_mph)?,
        min_wind_speed: reduce(hourly, var::WIND_SPEED, coverage::ALL, &slots, aggregate::min, WindSpeed::from_mph)?,
        max_wind_gusts: reduce(
            hourly,
            var::WIND_GUSTS,
            coverage::WIND_GUSTS,
            &slots,
            aggregate::max,
            WindSpeed::from_mph,
        )?,
        min_wind_gusts: reduce(
            hourly,
            var::WIND_GUSTS,
            coverage::WIND_GUSTS,
            &slots,
            aggregate::min,
            WindSpeed::from_mph,
        )?,
        total_rain,
        total_showers,
        total_snowfall: reduce(
            hourly,
            var::SNOWFALL,
            coverage::ALL,
            &slots,
            aggregate::sum,
            Precipitation::from_inches,
        )?,
        total_precipitation: reduce(
            hourly,
            var::PRECIPITATION,
            coverage::ALL,
            &slots,
            aggregate::sum,
            Precipitation::from_inches,
        )?,
        total_liquid_precipitation,
    })
}

/// Read one numeric cell per listed model
fn collect<V>(
    block: &SeriesBlock,
    variable: &str,
    models: &[WeatherModel],
    index: usize,
    build: impl Fn(f64) -> V,
) -> Result<ModelValues<V>> {
    let mut values = ModelValues::new();
    for &model in models {
        if let Some(raw) = block.number(variable, model, index)? {
            values.insert(model, build(raw));
        }
    }
    Ok(values)
}

/// Read one text cell per listed model; values `parse` rejects are left out
fn collect_text<V>(
    block: &SeriesBlock,
    variable: &str,
    models: &[WeatherModel],
    index: usize,
    parse: impl Fn(&str) -> Option<V>,
) -> Result<ModelValues<V>> {
    let mut values = ModelValues::new();
    for &model in models {
        if let Some(parsed) = block.text(variable, model, index)?.and_then(&parse) {
            values.insert(model, parsed);
        }
    }
    Ok(values)
}

/// Reduce each listed model's hourly values over `slots`.
///
/// An empty day reduces to the aggregate's empty-range value. A model whose
/// cells are all `null` for a non-empty day is left out.
fn reduce<V>(
    block: &SeriesBlock,
    variable: &str,
    models: &[WeatherModel],
    slots: &[usize],
    reducer: fn(&[f64]) -> f64,
    build: impl Fn(f64) -> V,
) -> Result<ModelValues<V>> {
    let mut values = ModelValues::new();
    for &model in models {
        let mut samples = Vec::with_capacity(slots.len());
        for &slot in slots {
            if let Some(raw) = block.number(variable, model, slot)? {
                samples.push(raw);
            }
        }
        if !slots.is_empty() && samples.is_empty() {
            continue;
        }
        values.insert(model, build(reducer(&samples)));
    }
    Ok(values)
}

fn wind_at(hourly: &SeriesBlock, index: usize) -> Result<ModelValues<Wind>> {
    let mut values = ModelValues::new();
    for &model in coverage::ALL {
        let speed = hourly.number(var::WIND_SPEED, model, index)?;
        let direction = hourly.number(var::WIND_DIRECTION, model, index)?;
        let gusts = if coverage::WIND_GUSTS.contains(&model) {
            hourly.number(var::WIND_GUSTS, model, index)?
        } else {
            None
        };
        if let (Some(speed), Some(direction)) = (speed, direction) {
            values.insert(model, Wind::from_mph(speed, gusts, direction));
        }
    }
    Ok(values)
}

#[allow(clippy::cast_possible_truncation)]
fn weather_from(raw: f64) -> Weather {
    Weather::new(raw.round() as i32)
}

fn fraction(percent: f64) -> f64 {
    percent / 100.0
}

fn identity(value: f64) -> f64 {
    value
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::{Coordinates, LocationInfo};
    use serde_json::{Map, Value, json};

    pub(crate) fn point() -> ForecastPoint {
        ForecastPoint {
            coordinates: Coordinates::new(39.6403, -106.3742).unwrap(),
            elevation: Elevation::from_feet(8150.0),
            location: LocationInfo {
                name: "Vail".to_string(),
                state: "Colorado".to_string(),
                country_code: "us".to_string(),
                ..LocationInfo::default()
            },
        }
    }

    pub(crate) fn hourly_times(days: usize) -> Vec<String> {
        (0..days * 24)
            .map(|h| format!("2025-01-{:02}T{:02}:00", 15 + h / 24, h % 24))
            .collect()
    }

    /// Payload where every model publishes every variable it is listed for,
    /// with `value(variable, model, hour)` as the hourly reading.
    pub(crate) fn response(days: usize, value: impl Fn(&str, WeatherModel, usize) -> Value) -> ForecastResponse {
        let hourly_time = hourly_times(days);
        let mut hourly = Map::new();
        hourly.insert("time".to_string(), json!(hourly_time));
        let hourly_columns: [(&str, &[WeatherModel]); 20] = [
            (var::FREEZING_LEVEL, coverage::FREEZING_LEVEL),
            (var::IS_DAY, coverage::ALL),
            (var::TEMPERATURE, coverage::ALL),
            (var::WEATHER_CODE, coverage::ALL),
            (var::APPARENT_TEMPERATURE, coverage::WITHOUT_GRAPHCAST),
            (var::PRECIPITATION_PROBABILITY, coverage::PRECIPITATION_PROBABILITY),
            (var::PRECIPITATION, coverage::ALL),
            (var::CLOUD_COVER, coverage::ALL),
            (var::CLOUD_COVER_LOW, coverage::CLOUD_BANDS),
            (var::CLOUD_COVER_MID, coverage::CLOUD_BANDS),
            (var::CLOUD_COVER_HIGH, coverage::CLOUD_BANDS),
            (var::VISIBILITY, coverage::VISIBILITY),
            (var::WIND_SPEED, coverage::ALL),
            (var::WIND_DIRECTION, coverage::ALL),
            (var::WIND_GUSTS, coverage::WIND_GUSTS),
            (var::RELATIVE_HUMIDITY, coverage::WITHOUT_GRAPHCAST),
            (var::RAIN, coverage::ALL),
            (var::SHOWERS, coverage::ALL),
            (var::SNOWFALL, coverage::ALL),
            (var::SNOW_DEPTH, coverage::SNOW_DEPTH),
        ];
        for (variable, models) in hourly_columns {
            for &model in models {
                let column: Vec<Value> = (0..hourly_time.len()).map(|h| value(variable, model, h)).collect();
                hourly.insert(SeriesBlock::key(variable, model), Value::Array(column));
            }
        }

        let daily_time: Vec<String> = (0..days).map(|d| format!("2025-01-{:02}", 15 + d)).collect();
        let mut daily = Map::new();
        daily.insert("time".to_string(), json!(daily_time));
        for &model in coverage::ALL {
            let sunrise: Vec<String> = daily_time.iter().map(|d| format!("{d}T07:19")).collect();
            let sunset: Vec<String> = daily_time.iter().map(|d| format!("{d}T16:58")).collect();
            daily.insert(SeriesBlock::key(var::SUNRISE, model), json!(sunrise));
            daily.insert(SeriesBlock::key(var::SUNSET, model), json!(sunset));
            daily.insert(SeriesBlock::key(var::WEATHER_CODE, model), json!(vec![73; days]));
        }
        for &model in coverage::WITHOUT_GRAPHCAST {
            daily.insert(
                SeriesBlock::key(var::SNOWFALL_WATER_EQUIVALENT_SUM, model),
                json!(vec![0.4; days]),
            );
            daily.insert(
                SeriesBlock::key(var::WIND_DIRECTION_DOMINANT, model),
                json!(vec![270; days]),
            );
        }

        serde_json::from_value(json!({
            "latitude": 39.64,
            "longitude": -106.37,
            "timezone": "America/Denver",
            "hourly": hourly,
            "daily": daily,
        }))
        .unwrap()
    }

    pub(crate) fn hour_value(_: &str, _: WeatherModel, hour: usize) -> Value {
        json!(hour)
    }

    pub(crate) fn noon_utc() -> DateTime<Utc> {
        // 10:00 in Denver on the first day
        DateTime::parse_from_rfc3339("2025-01-15T17:00:00Z").unwrap().with_timezone(&Utc)
    }
}
