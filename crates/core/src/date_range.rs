//! Calendar date-range filters built from optional `day`/`month`/`year`
//! query parameters.
//!
//! Missing components widen the window as far as they can: an absent year
//! spans 1970..=9999, an absent month spans January..=December, an absent day
//! spans the first..=last day of the month. Both ends are inclusive and
//! aligned to whole calendar days in UTC. An empty parameter (`?day=`)
//! counts as absent.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Earliest year an open-ended range starts at.
pub const OPEN_START_YEAR: i32 = 1970;

/// Latest year an open-ended range runs to.
pub const OPEN_END_YEAR: i32 = 9999;

/// Raw `?day=&month=&year=` query parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DateRangeQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub day: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub month: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub year: Option<i32>,
}

/// Parse a query component, treating an empty or whitespace-only value as
/// not supplied.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// An inclusive `[start, end]` window of UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl DateRange {
    pub fn contains(&self, at: Timestamp) -> bool {
        self.start <= at && at <= self.end
    }
}

impl DateRangeQuery {
    pub fn is_empty(&self) -> bool {
        self.day.is_none() && self.month.is_none() && self.year.is_none()
    }

    /// Build the inclusive window, or `None` when no component was supplied.
    ///
    /// Fails with [`CoreError::Validation`] when a component is out of range
    /// or the combination names a date that does not exist (e.g. 31 February).
    pub fn to_range(&self) -> Result<Option<DateRange>, CoreError> {
        if self.is_empty() {
            return Ok(None);
        }

        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(CoreError::Validation(format!(
                    "month must be between 1 and 12, got {month}"
                )));
            }
        }
        if let Some(day) = self.day {
            if !(1..=31).contains(&day) {
                return Err(CoreError::Validation(format!(
                    "day must be between 1 and 31, got {day}"
                )));
            }
        }
        if let Some(year) = self.year {
            if !(OPEN_START_YEAR..=OPEN_END_YEAR).contains(&year) {
                return Err(CoreError::Validation(format!(
                    "year must be between {OPEN_START_YEAR} and {OPEN_END_YEAR}, got {year}"
                )));
            }
        }

        let start_year = self.year.unwrap_or(OPEN_START_YEAR);
        let end_year = self.year.unwrap_or(OPEN_END_YEAR);
        let start_month = self.month.unwrap_or(1);
        let end_month = self.month.unwrap_or(12);

        let start_day = self.day.unwrap_or(1);
        let end_day = match self.day {
            Some(day) => day,
            None => last_day_of_month(end_year, end_month)?,
        };

        let start_date = calendar_date(start_year, start_month, start_day)?;
        let end_date = calendar_date(end_year, end_month, end_day)?;

        let end_of_day = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
            .ok_or_else(|| CoreError::Internal("invalid end-of-day time".into()))?;

        Ok(Some(DateRange {
            start: Utc.from_utc_datetime(&start_date.and_time(NaiveTime::MIN)),
            end: Utc.from_utc_datetime(&end_date.and_time(end_of_day)),
        }))
    }
}

fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, CoreError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        CoreError::Validation(format!("{year:04}-{month:02}-{day:02} is not a valid date"))
    })
}

fn last_day_of_month(year: i32, month: u32) -> Result<u32, CoreError> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| CoreError::Validation(format!("month {month} of {year} is out of range")))?;
    first_of_next
        .pred_opt()
        .map(|d| d.day())
        .ok_or_else(|| CoreError::Validation(format!("month {month} of {year} is out of range")))
}
