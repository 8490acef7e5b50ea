//! Per-dataset rollups across everything stored.

use crate::precipitation::{aggregate_precipitation, DayValue};
use crate::series::{load_series, HourlySample, Series};
use crate::store::WeatherStore;
use serde::Serialize;
use std::collections::BTreeMap;
use wxs_meteo::dataset::Dataset;
use wxs_utils::dates::format_date;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    pub start_date: String,
    pub end_date: String,
    pub temperature_average: f64,
    pub precipitation_total: f64,
    pub days_with_precipitation: usize,
    pub precipitation_max: Option<DayValue>,
    /// Day of the hottest hour (earliest on ties)
    pub temperature_max: Option<DayValue>,
    /// Day of the coldest hour (earliest on ties)
    pub temperature_min: Option<DayValue>,
}

/// Summary entries keyed by `"<city> (<start>..<end>)"`.
pub type Summary = BTreeMap<String, SummaryEntry>;

fn day_of(sample: &HourlySample) -> DayValue {
    DayValue {
        date: sample.day_key.clone(),
        value: sample.temperature,
    }
}

/// Roll up one dataset's series, or `None` if it has no hours.
pub fn summary_entry(dataset: &Dataset, series: &Series) -> Option<SummaryEntry> {
    let temperature_average = series.mean_temperature()?;
    let precipitation = aggregate_precipitation(series);

    Some(SummaryEntry {
        start_date: format_date(&dataset.start_date),
        end_date: format_date(&dataset.end_date),
        temperature_average,
        precipitation_total: precipitation.total,
        days_with_precipitation: precipitation.days_with_precipitation,
        precipitation_max: precipitation.max,
        temperature_max: series.warmest().map(day_of),
        temperature_min: series.coldest().map(day_of),
    })
}

/// Summarize every stored dataset in one sequential pass.
///
/// Datasets without hours are left out of the result.
pub fn summarize<S: WeatherStore + ?Sized>(store: &S) -> anyhow::Result<Summary> {
    let datasets = store.list_datasets()?;
    let mut summary = Summary::new();

    for dataset in &datasets {
        let series = load_series(store, dataset)?;
        match summary_entry(dataset, &series) {
            Some(entry) => {
                summary.insert(dataset.composite_key(), entry);
            }
            None => log::warn!(
                "[WXS Debug] summary: skipping empty dataset {} ({})",
                dataset.id,
                dataset.composite_key()
            ),
        }
    }

    log::info!(
        "[WXS Debug] summary: {} of {} datasets summarized",
        summary.len(),
        datasets.len()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_store::{date, hour, madrid_store, record, MemoryStore};

    #[test]
    fn empty_datasets_are_skipped() {
        let mut store = madrid_store();
        let sevilla = store.add_city("Sevilla");
        store.add_dataset(&sevilla, date(2024, 7, 1), date(2024, 7, 2), vec![]);

        let summary = summarize(&store).unwrap();
        assert_eq!(summary.len(), 1);
        assert!(summary.contains_key("Madrid (2024-07-01..2024-07-02)"));
    }

    #[test]
    fn entry_matches_aggregators() {
        let store = madrid_store();
        let summary = summarize(&store).unwrap();
        let entry = &summary["Madrid (2024-07-01..2024-07-02)"];

        assert_eq!(entry.start_date, "2024-07-01");
        assert_eq!(entry.end_date, "2024-07-02");
        assert!((entry.temperature_average - 17.5).abs() < 1e-9);
        assert!((entry.precipitation_total - 7.0).abs() < 1e-9);
        assert_eq!(entry.days_with_precipitation, 2);
        assert_eq!(
            entry.precipitation_max,
            Some(DayValue {
                date: "2024-07-02".to_string(),
                value: 4.0
            })
        );
        assert_eq!(
            entry.temperature_max,
            Some(DayValue {
                date: "2024-07-01".to_string(),
                value: 30.0
            })
        );
        assert_eq!(
            entry.temperature_min,
            Some(DayValue {
                date: "2024-07-02".to_string(),
                value: 5.0
            })
        );
    }

    #[test]
    fn same_city_different_ranges_get_distinct_keys() {
        let mut store = madrid_store();
        let madrid = store.cities[0].clone();
        store.add_dataset(
            &madrid,
            date(2024, 6, 1),
            date(2024, 6, 1),
            vec![record(hour(2024, 6, 1, 12), 22.0, 0.0)],
        );

        let summary = summarize(&store).unwrap();
        assert_eq!(summary.len(), 2);
        assert!(summary.contains_key("Madrid (2024-06-01..2024-06-01)"));
        assert!(summary.contains_key("Madrid (2024-07-01..2024-07-02)"));
        assert_eq!(summary["Madrid (2024-06-01..2024-06-01)"].days_with_precipitation, 0);
    }

    #[test]
    fn no_datasets_gives_empty_summary() {
        let store = MemoryStore::default();
        assert!(summarize(&store).unwrap().is_empty());
    }

    #[test]
    fn serializes_as_keyed_object() {
        let summary = summarize(&madrid_store()).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        let entry = &json["Madrid (2024-07-01..2024-07-02)"];
        assert_eq!(entry["temperature_max"]["date"], "2024-07-01");
        assert_eq!(entry["precipitation_max"]["value"], 4.0);
    }
}
