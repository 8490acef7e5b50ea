//! The three statistics operations: resolve, load, aggregate.

use crate::error::Result;
use crate::precipitation::{aggregate_precipitation, PrecipitationStats};
use crate::resolver::{resolve_dataset, DateInput};
use crate::series::load_series;
use crate::store::WeatherStore;
use crate::summary::{summarize, Summary};
use crate::temperature::{aggregate_temperature, TemperatureStats, Thresholds};
use chrono::NaiveDate;
use serde::Serialize;

/// `{"temperature": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureResponse {
    pub temperature: TemperatureStats,
}

/// `{"precipitation": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecipitationResponse {
    pub precipitation: PrecipitationStats,
}

/// Statistics over a store, with "today" fixed for range validation.
///
/// Holds no state besides the borrowed store; every call reloads its series.
pub struct StatsService<'a, S: WeatherStore + ?Sized> {
    store: &'a S,
    today: NaiveDate,
}

impl<'a, S: WeatherStore + ?Sized> StatsService<'a, S> {
    pub fn new(store: &'a S, today: NaiveDate) -> Self {
        Self { store, today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn temperature_stats(
        &self,
        city_name: &str,
        start_date: &DateInput,
        end_date: &DateInput,
        thresholds: Thresholds,
    ) -> Result<TemperatureResponse> {
        let dataset = resolve_dataset(self.store, city_name, start_date, end_date, self.today)?;
        let series = load_series(self.store, &dataset)?;
        Ok(TemperatureResponse {
            temperature: aggregate_temperature(&series, thresholds),
        })
    }

    pub fn precipitation_stats(
        &self,
        city_name: &str,
        start_date: &DateInput,
        end_date: &DateInput,
    ) -> Result<PrecipitationResponse> {
        let dataset = resolve_dataset(self.store, city_name, start_date, end_date, self.today)?;
        let series = load_series(self.store, &dataset)?;
        Ok(PrecipitationResponse {
            precipitation: aggregate_precipitation(&series),
        })
    }

    pub fn summary_stats(&self) -> Result<Summary> {
        Ok(summarize(self.store)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsError;
    use crate::test_store::{date, madrid_store};

    #[test]
    fn temperature_end_to_end() {
        let store = madrid_store();
        let service = StatsService::new(&store, date(2024, 8, 1));
        let response = service
            .temperature_stats(
                "madrid",
                &"2024-07-01".into(),
                &"2024-07-02".into(),
                Thresholds {
                    above: 18.0,
                    below: 8.0,
                },
            )
            .unwrap();
        assert!((response.temperature.average.unwrap() - 17.5).abs() < 1e-9);
        assert_eq!(response.temperature.hours_above_threshold, 3);
        assert_eq!(response.temperature.hours_below_threshold, 1);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["temperature"]["min"]["date_time"], "2024-07-02T10:00");
    }

    #[test]
    fn precipitation_end_to_end() {
        let store = madrid_store();
        let service = StatsService::new(&store, date(2024, 8, 1));
        let response = service
            .precipitation_stats("Madrid", &"2024-07-01".into(), &"2024-07-02".into())
            .unwrap();
        assert!((response.precipitation.average - 3.5).abs() < 1e-9);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["precipitation"]["max"]["date"], "2024-07-02");
    }

    #[test]
    fn errors_propagate_unchanged() {
        let store = madrid_store();
        let service = StatsService::new(&store, date(2024, 7, 2));
        let err = service
            .precipitation_stats("Madrid", &"2024-07-01".into(), &"2024-07-02".into())
            .unwrap_err();
        assert!(matches!(err, StatsError::InvalidDateRange(_)));

        let service = StatsService::new(&store, date(2024, 8, 1));
        let err = service
            .temperature_stats(
                "Lisbon",
                &"2024-07-01".into(),
                &"2024-07-02".into(),
                Thresholds::default(),
            )
            .unwrap_err();
        assert!(matches!(err, StatsError::DatasetNotFound(_)));
    }

    #[test]
    fn empty_dataset_is_not_an_error() {
        let mut store = madrid_store();
        let oslo = store.add_city("Oslo");
        store.add_dataset(&oslo, date(2024, 1, 1), date(2024, 1, 2), vec![]);
        let service = StatsService::new(&store, date(2024, 8, 1));

        let temperature = service
            .temperature_stats(
                "Oslo",
                &"2024-01-01".into(),
                &"2024-01-02".into(),
                Thresholds::default(),
            )
            .unwrap();
        assert_eq!(temperature.temperature.average, None);

        let precipitation = service
            .precipitation_stats("Oslo", &"2024-01-01".into(), &"2024-01-02".into())
            .unwrap();
        assert_eq!(precipitation.precipitation.total, 0.0);
        assert_eq!(precipitation.precipitation.max, None);
    }

    #[test]
    fn storage_failures_surface_as_storage_errors() {
        let mut store = madrid_store();
        store.fail_loads = true;
        let service = StatsService::new(&store, date(2024, 8, 1));
        let err = service.summary_stats().unwrap_err();
        assert!(matches!(err, StatsError::Storage(_)));
    }
}
