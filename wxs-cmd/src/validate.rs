//! Input checks applied before any command touches storage or the network.

use chrono::NaiveDate;
use thiserror::Error;
use wxs_meteo::date_range::DateRange;
use wxs_stats::resolver::parse_range;
use wxs_stats::{DateInput, Thresholds};
use wxs_utils::dates::parse_date;

/// Longest accepted city name, in characters.
pub const MAX_CITY_LEN: usize = 255;

/// A request rejected at the command boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Trim `city` and check it is non-empty and at most [`MAX_CITY_LEN`] characters.
pub fn city_name(city: &str) -> Result<String, ValidationError> {
    let trimmed = city.trim();
    if trimmed.is_empty() {
        return Err(ValidationError("city must not be empty.".to_string()));
    }
    if trimmed.chars().count() > MAX_CITY_LEN {
        return Err(ValidationError(format!(
            "city must be at most {} characters.",
            MAX_CITY_LEN
        )));
    }
    Ok(trimmed.to_string())
}

pub fn thresholds(above: f64, below: f64) -> Result<Thresholds, ValidationError> {
    if above < below {
        return Err(ValidationError("above must be >= below.".to_string()));
    }
    Ok(Thresholds { above, below })
}

/// Parse and check a `start..=end` pair; failures are `StatsError::InvalidDateRange`.
pub fn date_range(start: &str, end: &str, today: NaiveDate) -> wxs_stats::Result<DateRange> {
    parse_range(
        &DateInput::from(start.trim()),
        &DateInput::from(end.trim()),
        today,
    )
}

/// The reference date: `override_date` when given, otherwise the local calendar date.
pub fn today(override_date: Option<&str>) -> Result<NaiveDate, ValidationError> {
    match override_date {
        Some(text) => parse_date(text).map_err(|_| {
            ValidationError(format!("today must be YYYY-MM-DD (got '{}').", text))
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}
