//! Date and update-body validation. Everything here is pure.

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{UpdateWeatherRequest, WeatherPatch};

/// Calendar format accepted for `start_date` / `end_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid {field} format. Use YYYY-MM-DD")]
    InvalidFormat { field: &'static str },

    #[error("Start date must be before end date")]
    InvalidRange,

    #[error("No valid fields to update")]
    NoFields,
}

/// A parsed, ordered pair of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidRange);
        }
        Ok(Self { start, end })
    }
}

pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidFormat { field })
}

/// Parse both dates, then check `start <= end`.
///
/// A malformed date is always reported as `InvalidFormat`, even when the
/// other one would also fail the range check.
pub fn validate_range(start: &str, end: &str) -> Result<DateRange, ValidationError> {
    let start = parse_date("start_date", start)?;
    let end = parse_date("end_date", end)?;
    DateRange::new(start, end)
}

/// Turn an update body into a patch.
///
/// `stored` is the range currently persisted for the record; a date the body
/// leaves out keeps its stored value when checking the ordering.
pub fn validate_update(
    update: &UpdateWeatherRequest,
    stored: DateRange,
) -> Result<WeatherPatch, ValidationError> {
    if update.is_empty() {
        return Err(ValidationError::NoFields);
    }

    let start_date = update
        .start_date
        .as_deref()
        .map(|s| parse_date("start_date", s))
        .transpose()?;
    let end_date = update
        .end_date
        .as_deref()
        .map(|s| parse_date("end_date", s))
        .transpose()?;

    if start_date.is_some() || end_date.is_some() {
        DateRange::new(
            start_date.unwrap_or(stored.start),
            end_date.unwrap_or(stored.end),
        )?;
    }

    Ok(WeatherPatch {
        location: update.location.clone(),
        lat: update.lat,
        lon: update.lon,
        start_date,
        end_date,
        weather_data: None,
    })
}
