//! In-memory store and fixtures shared by the unit tests.

use crate::series::Series;
use crate::store::WeatherStore;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::HashMap;
use wxs_meteo::city::City;
use wxs_meteo::dataset::Dataset;
use wxs_meteo::date_range::DateRange;
use wxs_meteo::hourly::HourlyRecord;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn hour(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn record(timestamp: DateTime<Utc>, temperature: f64, precipitation: f64) -> HourlyRecord {
    HourlyRecord {
        timestamp,
        temperature,
        precipitation,
    }
}

/// Three hours on each of 2024-07-01 and 2024-07-02 (10:00-12:00 UTC).
///
/// Temperatures 10, 20, 30 | 5, 15, 25; precipitation 0, 1, 2 | 0, 0, 4.
pub fn two_day_records() -> Vec<HourlyRecord> {
    vec![
        record(hour(2024, 7, 1, 10), 10.0, 0.0),
        record(hour(2024, 7, 1, 11), 20.0, 1.0),
        record(hour(2024, 7, 1, 12), 30.0, 2.0),
        record(hour(2024, 7, 2, 10), 5.0, 0.0),
        record(hour(2024, 7, 2, 11), 15.0, 0.0),
        record(hour(2024, 7, 2, 12), 25.0, 4.0),
    ]
}

pub fn two_day_series() -> Series {
    Series::from_records(two_day_records())
}

#[derive(Default)]
pub struct MemoryStore {
    pub cities: Vec<City>,
    pub datasets: Vec<Dataset>,
    pub hours: HashMap<i64, Vec<HourlyRecord>>,
    pub fail_loads: bool,
}

impl MemoryStore {
    pub fn add_city(&mut self, name: &str) -> City {
        let city = City {
            id: self.cities.len() as i64 + 1,
            name: name.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            country_code: "XX".to_string(),
            country: "Testland".to_string(),
            timezone: "UTC".to_string(),
        };
        self.cities.push(city.clone());
        city
    }

    pub fn add_dataset(
        &mut self,
        city: &City,
        start_date: NaiveDate,
        end_date: NaiveDate,
        hours: Vec<HourlyRecord>,
    ) -> Dataset {
        let dataset = Dataset {
            id: self.datasets.len() as i64 + 1,
            city_id: city.id,
            city_name: city.name.clone(),
            start_date,
            end_date,
            created_at: "2024-08-01T00:00:00+00:00".to_string(),
            source: "test".to_string(),
        };
        self.hours.insert(dataset.id, hours);
        self.datasets.push(dataset.clone());
        dataset
    }
}

/// Madrid with one dataset for 2024-07-01..2024-07-02 holding [`two_day_records`].
pub fn madrid_store() -> MemoryStore {
    let mut store = MemoryStore::default();
    let madrid = store.add_city("Madrid");
    store.add_dataset(&madrid, date(2024, 7, 1), date(2024, 7, 2), two_day_records());
    store
}

impl WeatherStore for MemoryStore {
    fn find_city(&self, name: &str) -> anyhow::Result<Option<City>> {
        let wanted = name.to_lowercase();
        Ok(self
            .cities
            .iter()
            .find(|c| c.name.to_lowercase() == wanted)
            .cloned())
    }

    fn find_dataset(&self, city: &City, range: &DateRange) -> anyhow::Result<Option<Dataset>> {
        Ok(self
            .datasets
            .iter()
            .find(|d| {
                d.city_id == city.id && d.start_date == range.start() && d.end_date == range.end()
            })
            .cloned())
    }

    fn list_datasets(&self) -> anyhow::Result<Vec<Dataset>> {
        Ok(self.datasets.clone())
    }

    fn load_hours(&self, dataset: &Dataset) -> anyhow::Result<Vec<HourlyRecord>> {
        if self.fail_loads {
            anyhow::bail!("disk on fire");
        }
        Ok(self.hours.get(&dataset.id).cloned().unwrap_or_default())
    }
}
