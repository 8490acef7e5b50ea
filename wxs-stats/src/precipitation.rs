//! Precipitation statistics over a series.

use crate::series::{first_extreme, Series};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A calendar day paired with a value, e.g. the wettest day's total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayValue {
    /// "YYYY-MM-DD"
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecipitationStats {
    pub total: f64,
    pub total_by_day: BTreeMap<String, f64>,
    pub days_with_precipitation: usize,
    /// Day with the largest daily total; earliest day on ties
    pub max: Option<DayValue>,
    /// Mean daily total: `total / days present` (not per hour)
    pub average: f64,
}

/// Compute precipitation statistics for `series`.
///
/// An empty series yields zero totals, an empty per-day map and no max day.
pub fn aggregate_precipitation(series: &Series) -> PrecipitationStats {
    let total_by_day: BTreeMap<String, f64> = series
        .by_day()
        .into_iter()
        .map(|(day, acc)| (day.to_string(), acc.precipitation_sum))
        .collect();

    let total = series.total_precipitation();
    let days_with_precipitation = total_by_day.values().filter(|v| **v > 0.0).count();
    let max = first_extreme(total_by_day.iter(), |(_, v)| **v, Ordering::Greater).map(
        |(date, value)| DayValue {
            date: date.clone(),
            value: *value,
        },
    );
    let average = total / total_by_day.len().max(1) as f64;

    PrecipitationStats {
        total,
        total_by_day,
        days_with_precipitation,
        max,
        average,
    }
}
