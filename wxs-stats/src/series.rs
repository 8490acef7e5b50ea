//! In-memory, day-tagged hourly series for one dataset.

use crate::store::WeatherStore;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use wxs_meteo::dataset::Dataset;
use wxs_meteo::hourly::HourlyRecord;
use wxs_utils::dates::day_key;

/// One hour of a series, tagged with its UTC calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySample {
    pub timestamp: DateTime<Utc>,
    /// "YYYY-MM-DD" of `timestamp` in UTC
    pub day_key: String,
    pub temperature: f64,
    pub precipitation: f64,
}

impl From<HourlyRecord> for HourlySample {
    fn from(record: HourlyRecord) -> Self {
        HourlySample {
            day_key: day_key(&record.timestamp),
            timestamp: record.timestamp,
            temperature: record.temperature,
            precipitation: record.precipitation,
        }
    }
}

/// Running totals for the hours of one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayAccumulator {
    pub hours: usize,
    pub temperature_sum: f64,
    pub precipitation_sum: f64,
}

impl DayAccumulator {
    fn push(&mut self, sample: &HourlySample) {
        self.hours += 1;
        self.temperature_sum += sample.temperature;
        self.precipitation_sum += sample.precipitation;
    }

    pub fn mean_temperature(&self) -> f64 {
        self.temperature_sum / self.hours as f64
    }
}

/// Hourly samples ascending by timestamp. May be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series(Vec<HourlySample>);

impl Series {
    /// Build a series from stored rows, sorting them by timestamp.
    ///
    /// The sort is stable, so rows sharing a timestamp keep their order.
    pub fn from_records<I: IntoIterator<Item = HourlyRecord>>(records: I) -> Self {
        let mut samples: Vec<HourlySample> = records.into_iter().map(HourlySample::from).collect();
        samples.sort_by_key(|s| s.timestamp);
        Series(samples)
    }

    pub fn samples(&self) -> &[HourlySample] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Arithmetic mean of all temperatures, `None` for an empty series.
    pub fn mean_temperature(&self) -> Option<f64> {
        if self.0.is_empty() {
            return None;
        }
        let sum: f64 = self.0.iter().map(|s| s.temperature).sum();
        Some(sum / self.0.len() as f64)
    }

    /// Sum of all precipitation values.
    pub fn total_precipitation(&self) -> f64 {
        self.0.iter().map(|s| s.precipitation).sum()
    }

    /// The hottest sample; the earliest one wins a tie.
    pub fn warmest(&self) -> Option<&HourlySample> {
        first_extreme(self.0.iter(), |s| s.temperature, Ordering::Greater)
    }

    /// The coldest sample; the earliest one wins a tie.
    pub fn coldest(&self) -> Option<&HourlySample> {
        first_extreme(self.0.iter(), |s| s.temperature, Ordering::Less)
    }

    /// Group the series by day key in one pass. Iteration is ascending by day.
    pub fn by_day(&self) -> BTreeMap<&str, DayAccumulator> {
        let mut days: BTreeMap<&str, DayAccumulator> = BTreeMap::new();
        for sample in &self.0 {
            days.entry(sample.day_key.as_str()).or_default().push(sample);
        }
        days
    }
}

/// First item whose key compares `wanted` against every earlier candidate.
///
/// Items are replaced only on a strict improvement, so on ties the first one
/// seen is kept. NaN keys never become the extreme.
pub(crate) fn first_extreme<T, I, F>(items: I, key: F, wanted: Ordering) -> Option<T>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> f64,
{
    let mut best: Option<(T, f64)> = None;
    for item in items {
        let value = key(&item);
        if value.is_nan() {
            continue;
        }
        let improves = match &best {
            Some((_, best_value)) => value.partial_cmp(best_value) == Some(wanted),
            None => true,
        };
        if improves {
            best = Some((item, value));
        }
    }
    best.map(|(item, _)| item)
}

/// Materialize the hours of `dataset` as a [`Series`].
///
/// An empty dataset gives an empty series, not an error.
pub fn load_series<S: WeatherStore + ?Sized>(
    store: &S,
    dataset: &Dataset,
) -> anyhow::Result<Series> {
    let records = store.load_hours(dataset)?;
    let series = Series::from_records(records);
    log::info!(
        "[WXS Debug] series: dataset {} loaded {} hours",
        dataset.id,
        series.len()
    );
    Ok(series)
}
