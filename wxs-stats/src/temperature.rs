//! Temperature statistics over a series.

use crate::series::{HourlySample, Series};
use serde::Serialize;
use std::collections::BTreeMap;
use wxs_utils::dates::hour_stamp;

/// Default threshold for `hours_above_threshold`, degrees Celsius.
pub const DEFAULT_ABOVE: f64 = 30.0;
/// Default threshold for `hours_below_threshold`, degrees Celsius.
pub const DEFAULT_BELOW: f64 = 0.0;

/// Strict thresholds for counting hot and cold hours.
///
/// No relation between `above` and `below` is enforced here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub above: f64,
    pub below: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            above: DEFAULT_ABOVE,
            below: DEFAULT_BELOW,
        }
    }
}

/// A reported maximum or minimum hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extremum {
    pub value: f64,
    /// "YYYY-MM-DDTHH:MM" in UTC
    #[serde(rename = "date_time")]
    pub timestamp: String,
}

impl From<&HourlySample> for Extremum {
    fn from(sample: &HourlySample) -> Self {
        Extremum {
            value: sample.temperature,
            timestamp: hour_stamp(&sample.timestamp),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureStats {
    /// `None` when the series is empty
    pub average: Option<f64>,
    pub average_by_day: BTreeMap<String, f64>,
    pub max: Option<Extremum>,
    pub min: Option<Extremum>,
    pub hours_above_threshold: usize,
    pub hours_below_threshold: usize,
}

/// Compute temperature statistics for `series`.
///
/// An empty series yields no average, no extremes, an empty per-day map and
/// zero counts.
pub fn aggregate_temperature(series: &Series, thresholds: Thresholds) -> TemperatureStats {
    let average_by_day = series
        .by_day()
        .into_iter()
        .map(|(day, acc)| (day.to_string(), acc.mean_temperature()))
        .collect();

    let samples = series.samples();
    let hours_above_threshold = samples
        .iter()
        .filter(|s| s.temperature > thresholds.above)
        .count();
    let hours_below_threshold = samples
        .iter()
        .filter(|s| s.temperature < thresholds.below)
        .count();

    TemperatureStats {
        average: series.mean_temperature(),
        average_by_day,
        max: series.warmest().map(Extremum::from),
        min: series.coldest().map(Extremum::from),
        hours_above_threshold,
        hours_below_threshold,
    }
}
