//! Resolve a (city, start, end) request to one stored dataset.

use crate::error::{Result, StatsError};
use crate::store::WeatherStore;
use chrono::NaiveDate;
use wxs_meteo::dataset::Dataset;
use wxs_meteo::date_range::DateRange;
use wxs_utils::dates::{format_date, parse_date};

/// A request date: either already a calendar date or an ISO `YYYY-MM-DD`
/// string still to be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Date(NaiveDate),
    Iso(String),
}

impl DateInput {
    pub fn to_date(&self) -> Result<NaiveDate> {
        match self {
            DateInput::Date(date) => Ok(*date),
            DateInput::Iso(text) => parse_date(text).map_err(|_| {
                StatsError::InvalidDateRange(format!("Invalid date value: '{}'", text))
            }),
        }
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Iso(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Iso(text)
    }
}

/// Parse and validate a range against the reference date `today`.
pub fn parse_range(
    start_date: &DateInput,
    end_date: &DateInput,
    today: NaiveDate,
) -> Result<DateRange> {
    let start = start_date.to_date()?;
    let end = end_date.to_date()?;
    Ok(DateRange::in_past(start, end, today)?)
}

/// Find the dataset for `city_name` over exactly `start_date..=end_date`.
///
/// The range is validated before the store is touched. The city match
/// ignores case; the dataset must match the range exactly.
pub fn resolve_dataset<S: WeatherStore + ?Sized>(
    store: &S,
    city_name: &str,
    start_date: &DateInput,
    end_date: &DateInput,
    today: NaiveDate,
) -> Result<Dataset> {
    let range = parse_range(start_date, end_date, today)?;

    let city = store.find_city(city_name)?.ok_or_else(|| {
        StatsError::DatasetNotFound(format!(
            "City '{}' not found in DB. Load it first.",
            city_name
        ))
    })?;

    let dataset = store.find_dataset(&city, &range)?.ok_or_else(|| {
        let start = format_date(&range.start());
        let end = format_date(&range.end());
        StatsError::DatasetNotFound(format!(
            "No dataset found for city='{}' start_date='{}' end_date='{}'. \
             Run: wxs-cli load-city \"{}\" {} {} --replace",
            city.name, start, end, city.name, start, end
        ))
    })?;

    log::info!(
        "[WXS Debug] resolver: '{}' resolved to dataset {} ({})",
        city_name,
        dataset.id,
        dataset.composite_key()
    );
    Ok(dataset)
}
