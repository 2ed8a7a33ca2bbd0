//! Time-series alignment
//!
//! Parses the provider's local timestamps in the forecast timezone, finds the
//! hourly slot that represents "now" and splits the hourly series into one
//! contiguous index range per daily entry.

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::ops::Range;
use tracing::{debug, warn};

use crate::{MediSnowError, Result};

const HOURLY_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DAILY_FORMAT: &str = "%Y-%m-%d";

/// Resolve an IANA timezone name
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| MediSnowError::invalid_timezone(name))
}

/// Parse a provider local timestamp (`2025-01-15T07:00`) as an instant in `tz`.
///
/// Local times skipped by a DST transition do not exist and yield `None`.
/// Repeated local times resolve to the earlier instant unless `previous`
/// already reached it, in which case the later one is used so the series keeps
/// moving forward.
#[must_use]
pub fn parse_local(value: &str, tz: Tz, previous: Option<DateTime<Tz>>) -> Option<DateTime<Tz>> {
    let naive = NaiveDateTime::parse_from_str(value, HOURLY_FORMAT).ok()?;
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(instant) => Some(instant),
        LocalResult::Ambiguous(earliest, latest) => match previous {
            Some(previous) if previous >= earliest => Some(latest),
            _ => Some(earliest),
        },
        LocalResult::None => None,
    }
}

/// Index of the last timestamp not after `now`.
///
/// Scanning stops at the first timestamp after `now`; unparsed slots are
/// skipped. Falls back to 0 when nothing qualifies.
#[must_use]
pub fn current_index(hours: &[Option<DateTime<Tz>>], now: DateTime<Utc>) -> usize {
    let mut index = 0;
    for (i, hour) in hours.iter().enumerate() {
        let Some(hour) = hour else { continue };
        if hour.with_timezone(&Utc) > now {
            break;
        }
        index = i;
    }
    index
}

/// Hourly index range belonging to one daily entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRange {
    /// Position in the provider's daily series
    pub daily_index: usize,
    pub date: NaiveDate,
    /// `[start, end)` into the hourly series, empty when no hour matched
    pub hours: Range<usize>,
}

/// Aligned view over one provider response
#[derive(Debug, Clone)]
pub struct Timeline {
    tz: Tz,
    hours: Vec<Option<DateTime<Tz>>>,
    current_index: usize,
    days: Vec<DayRange>,
}

impl Timeline {
    /// Align `hourly` and `daily` series in timezone `tz_name` relative to `now`.
    ///
    /// Hourly entries must be in ascending order: the cursor never moves back,
    /// so an hour dated before the day being filled is passed over for good.
    pub fn align(hourly: &[String], daily: &[String], tz_name: &str, now: DateTime<Utc>) -> Result<Self> {
        let tz = parse_timezone(tz_name)?;

        let mut hours = Vec::with_capacity(hourly.len());
        let mut previous = None;
        for value in hourly {
            let parsed = parse_local(value, tz, previous);
            if parsed.is_none() {
                debug!(timestamp = %value, "Skipping unparseable hourly timestamp");
            }
            previous = parsed.or(previous);
            hours.push(parsed);
        }

        let current_index = current_index(&hours, now);
        let days = bucket_days(&hours, daily);

        Ok(Self {
            tz,
            hours,
            current_index,
            days,
        })
    }

    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn days(&self) -> &[DayRange] {
        &self.days
    }

    /// Parsed start of hourly slot `index`
    #[must_use]
    pub fn hour(&self, index: usize) -> Option<DateTime<FixedOffset>> {
        self.hours
            .get(index)
            .copied()
            .flatten()
            .map(|hour| hour.fixed_offset())
    }

    /// Indices in `range` whose timestamps parsed
    #[must_use]
    pub fn valid_slots(&self, range: &Range<usize>) -> Vec<usize> {
        range
            .clone()
            .filter(|&index| self.hours.get(index).is_some_and(Option::is_some))
            .collect()
    }
}

fn bucket_days(hours: &[Option<DateTime<Tz>>], daily: &[String]) -> Vec<DayRange> {
    let mut days = Vec::with_capacity(daily.len());
    let mut cursor = 0;

    for (daily_index, value) in daily.iter().enumerate() {
        let Ok(date) = NaiveDate::parse_from_str(value, DAILY_FORMAT) else {
            warn!(date = %value, "Skipping unparseable daily date");
            continue;
        };

        let mut first = None;
        let mut last = None;
        let mut position = cursor;
        while position < hours.len() {
            if let Some(hour) = hours[position] {
                let hour_date = hour.date_naive();
                if hour_date > date {
                    break;
                }
                if hour_date == date {
                    first.get_or_insert(position);
                    last = Some(position);
                }
            }
            position += 1;
        }

        let range = match (first, last) {
            (Some(first), Some(last)) => {
                cursor = last + 1;
                first..last + 1
            }
            _ => {
                cursor = position;
                cursor..cursor
            }
        };

        days.push(DayRange {
            daily_index,
            date,
            hours: range,
        });
    }

    days
}
