//! Typed read queries over cities, datasets and hours.
//!
//! Dates come back as [`NaiveDate`] and timestamps as UTC instants; a row
//! that cannot be converted is reported as an error rather than skipped.
//! [`Database`] implements [`WeatherStore`] on top of these methods.

use crate::models::DatasetInfo;
use crate::Database;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, OptionalExtension, Row};
use wxs_meteo::city::City;
use wxs_meteo::dataset::Dataset;
use wxs_meteo::date_range::DateRange;
use wxs_meteo::hourly::HourlyRecord;
use wxs_stats::WeatherStore;
use wxs_utils::dates::{format_date, parse_date};

const CITY_COLUMNS: &str = "id, name, latitude, longitude, country_code, country, timezone";

const DATASET_SELECT: &str = "SELECT d.id, d.city_id, c.name, d.start_date, d.end_date, d.created_at, d.source
     FROM datasets d
     INNER JOIN cities c ON c.id = d.city_id";

/// Raw dataset row before its date columns are parsed.
type DatasetRow = (i64, i64, String, String, String, String, String);

fn city_from_row(row: &Row<'_>) -> rusqlite::Result<City> {
    Ok(City {
        id: row.get(0)?,
        name: row.get(1)?,
        latitude: row.get(2)?,
        longitude: row.get(3)?,
        country_code: row.get(4)?,
        country: row.get(5)?,
        timezone: row.get(6)?,
    })
}

fn dataset_row(row: &Row<'_>) -> rusqlite::Result<DatasetRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn into_dataset(raw: DatasetRow) -> anyhow::Result<Dataset> {
    let (id, city_id, city_name, start, end, created_at, source) = raw;
    Ok(Dataset {
        id,
        city_id,
        city_name,
        start_date: parse_date(&start)?,
        end_date: parse_date(&end)?,
        created_at,
        source,
    })
}

fn hour_from_epoch(secs: i64) -> anyhow::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| anyhow::anyhow!("stored timestamp {} is out of range", secs))
}

impl Database {
    // ───────────────────── City Queries ─────────────────────

    /// Find a city by name, ignoring ASCII case.
    ///
    /// When several cities share the name (different countries) the first by
    /// name, then id, is returned.
    pub fn find_city(&self, name: &str) -> anyhow::Result<Option<City>> {
        let conn = self.conn.borrow();
        let city = conn
            .query_row(
                &format!(
                    "SELECT {} FROM cities WHERE name = ?1 COLLATE NOCASE ORDER BY name, id LIMIT 1",
                    CITY_COLUMNS
                ),
                params![name],
                city_from_row,
            )
            .optional()?;
        log::info!(
            "[WXS Debug] query: find_city('{}') returned {} records",
            name,
            usize::from(city.is_some())
        );
        Ok(city)
    }

    pub(crate) fn city_by_id(&self, id: i64) -> anyhow::Result<Option<City>> {
        let conn = self.conn.borrow();
        Ok(conn
            .query_row(
                &format!("SELECT {} FROM cities WHERE id = ?1", CITY_COLUMNS),
                params![id],
                city_from_row,
            )
            .optional()?)
    }

    /// Every stored city ordered by name.
    pub fn list_cities(&self) -> anyhow::Result<Vec<City>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM cities ORDER BY name, id",
            CITY_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], city_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("[WXS Debug] query: list_cities returned {} records", rows.len());
        Ok(rows)
    }

    // ───────────────────── Dataset Queries ─────────────────────

    /// The dataset of `city` covering exactly `range`.
    pub fn find_dataset(&self, city: &City, range: &DateRange) -> anyhow::Result<Option<Dataset>> {
        let conn = self.conn.borrow();
        let raw = conn
            .query_row(
                &format!(
                    "{} WHERE d.city_id = ?1 AND d.start_date = ?2 AND d.end_date = ?3",
                    DATASET_SELECT
                ),
                params![
                    city.id,
                    format_date(&range.start()),
                    format_date(&range.end())
                ],
                dataset_row,
            )
            .optional()?;
        let dataset = raw.map(into_dataset).transpose()?;
        log::info!(
            "[WXS Debug] query: find_dataset returned {} records",
            usize::from(dataset.is_some())
        );
        Ok(dataset)
    }

    pub(crate) fn dataset_by_id(&self, id: i64) -> anyhow::Result<Option<Dataset>> {
        let conn = self.conn.borrow();
        let raw = conn
            .query_row(
                &format!("{} WHERE d.id = ?1", DATASET_SELECT),
                params![id],
                dataset_row,
            )
            .optional()?;
        raw.map(into_dataset).transpose()
    }

    /// All datasets, newest first (`created_at` descending, then id descending).
    pub fn list_datasets(&self) -> anyhow::Result<Vec<Dataset>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY d.created_at DESC, d.id DESC",
            DATASET_SELECT
        ))?;
        let raw = stmt
            .query_map([], dataset_row)?
            .collect::<Result<Vec<_>, _>>()?;
        let rows = raw
            .into_iter()
            .map(into_dataset)
            .collect::<anyhow::Result<Vec<_>>>()?;
        log::info!("[WXS Debug] query: list_datasets returned {} records", rows.len());
        Ok(rows)
    }

    /// Datasets with their city's country and stored hour count, newest first.
    pub fn list_dataset_infos(&self) -> anyhow::Result<Vec<DatasetInfo>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT c.name, c.country_code, d.start_date, d.end_date, d.source, d.created_at,
                    COUNT(h.timestamp) AS hours
             FROM datasets d
             INNER JOIN cities c ON c.id = d.city_id
             LEFT JOIN hours h ON h.dataset_id = d.id
             GROUP BY d.id
             ORDER BY d.created_at DESC, d.id DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                let city: String = row.get(0)?;
                let start_date: String = row.get(2)?;
                let end_date: String = row.get(3)?;
                Ok(DatasetInfo {
                    key: format!("{} ({}..{})", city, start_date, end_date),
                    city,
                    country_code: row.get(1)?,
                    start_date,
                    end_date,
                    source: row.get(4)?,
                    created_at: row.get(5)?,
                    hours: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[WXS Debug] query: list_dataset_infos returned {} records",
            rows.len()
        );
        Ok(rows)
    }

    // ───────────────────── Hour Queries ─────────────────────

    /// All hours of `dataset`, ascending by timestamp.
    pub fn load_hours(&self, dataset: &Dataset) -> anyhow::Result<Vec<HourlyRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT timestamp, temperature, precipitation
             FROM hours
             WHERE dataset_id = ?1
             ORDER BY timestamp",
        )?;
        let raw = stmt
            .query_map(params![dataset.id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        let rows = raw
            .into_iter()
            .map(|(secs, temperature, precipitation)| {
                Ok(HourlyRecord {
                    timestamp: hour_from_epoch(secs)?,
                    temperature,
                    precipitation,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        log::info!(
            "[WXS Debug] query: load_hours({}) returned {} records",
            dataset.composite_key(),
            rows.len()
        );
        Ok(rows)
    }

    /// Number of stored hours for `dataset`.
    pub fn count_hours(&self, dataset: &Dataset) -> anyhow::Result<i64> {
        let conn = self.conn.borrow();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM hours WHERE dataset_id = ?1",
            params![dataset.id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Distinct UTC days of `range` that have no stored hour for `dataset`.
    pub fn missing_days(&self, dataset: &Dataset, range: &DateRange) -> anyhow::Result<Vec<NaiveDate>> {
        let stored: std::collections::HashSet<String> = self
            .load_hours(dataset)?
            .iter()
            .map(|h| format_date(&h.timestamp.date_naive()))
            .collect();
        Ok(range
            .days()
            .filter(|d| !stored.contains(&format_date(d)))
            .collect())
    }
}

impl WeatherStore for Database {
    fn find_city(&self, name: &str) -> anyhow::Result<Option<City>> {
        Database::find_city(self, name)
    }

    fn find_dataset(&self, city: &City, range: &DateRange) -> anyhow::Result<Option<Dataset>> {
        Database::find_dataset(self, city, range)
    }

    fn list_datasets(&self) -> anyhow::Result<Vec<Dataset>> {
        Database::list_datasets(self)
    }

    fn load_hours(&self, dataset: &Dataset) -> anyhow::Result<Vec<HourlyRecord>> {
        Database::load_hours(self, dataset)
    }
}
