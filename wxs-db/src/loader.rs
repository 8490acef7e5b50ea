//! Write paths: cities, datasets and hourly observations.
//!
//! Cities and datasets are get-or-create; hours are written in a single
//! transaction per load so a failed load leaves the dataset untouched.
//!
//! # CSV Format
//!
//! - **Hours** (has headers): `timestamp,temperature,precipitation`
//!
//! Timestamps are RFC 3339 or naive ISO (`2024-07-01T12:00`), naive values
//! being taken as UTC. Temperature is °C, precipitation mm.

use crate::{Database, LoadMode, LoadReport};
use chrono::SecondsFormat;
use rusqlite::{params, OptionalExtension};
use std::collections::HashSet;
use wxs_meteo::city::{City, NewCity};
use wxs_meteo::dataset::Dataset;
use wxs_meteo::date_range::DateRange;
use wxs_meteo::hourly::HourlyRecord;
use wxs_utils::dates::{format_date, parse_timestamp};

impl Database {
    /// Return the city with the same `(name, country_code)`, creating it first if absent.
    ///
    /// The boolean is `true` when a row was created. Existing rows are not updated.
    pub fn upsert_city(&self, city: &NewCity) -> anyhow::Result<(City, bool)> {
        let conn = self.conn.borrow();
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM cities WHERE name = ?1 AND country_code = ?2",
                params![city.name, city.country_code],
                |row| row.get(0),
            )
            .optional()?;

        let (id, created) = match existing {
            Some(id) => (id, false),
            None => {
                conn.execute(
                    "INSERT INTO cities (name, latitude, longitude, country_code, country, timezone)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        city.name,
                        city.latitude,
                        city.longitude,
                        city.country_code,
                        city.country,
                        city.timezone
                    ],
                )?;
                (conn.last_insert_rowid(), true)
            }
        };
        drop(conn);

        let stored = self
            .city_by_id(id)?
            .ok_or_else(|| anyhow::anyhow!("city {} vanished after upsert", id))?;
        log::info!(
            "[WXS Debug] loader: city {} ({}) {}",
            stored.name,
            stored.country_code,
            if created { "created" } else { "exists" }
        );
        Ok((stored, created))
    }

    /// Return the dataset for `city` over `range`, creating it first if absent.
    ///
    /// `source` and `created_at` are only written on creation.
    pub fn upsert_dataset(
        &self,
        city: &City,
        range: &DateRange,
        source: &str,
    ) -> anyhow::Result<(Dataset, bool)> {
        let start = format_date(&range.start());
        let end = format_date(&range.end());
        let conn = self.conn.borrow();
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM datasets WHERE city_id = ?1 AND start_date = ?2 AND end_date = ?3",
                params![city.id, start, end],
                |row| row.get(0),
            )
            .optional()?;

        let (id, created) = match existing {
            Some(id) => (id, false),
            None => {
                let created_at = chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
                conn.execute(
                    "INSERT INTO datasets (city_id, start_date, end_date, created_at, source)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![city.id, start, end, created_at, source],
                )?;
                (conn.last_insert_rowid(), true)
            }
        };
        drop(conn);

        let stored = self
            .dataset_by_id(id)?
            .ok_or_else(|| anyhow::anyhow!("dataset {} vanished after upsert", id))?;
        log::info!(
            "[WXS Debug] loader: dataset {} {}",
            stored.composite_key(),
            if created { "created" } else { "exists" }
        );
        Ok((stored, created))
    }

    /// Write hourly records for `dataset` in one transaction.
    ///
    /// With [`LoadMode::Replace`] every stored hour is deleted first. With
    /// [`LoadMode::SkipExisting`] timestamps already stored are counted as
    /// skipped. A timestamp repeated within `records` keeps its first
    /// occurrence. NaN values are rejected before anything is written.
    pub fn store_hours(
        &self,
        dataset: &Dataset,
        records: &[HourlyRecord],
        mode: LoadMode,
    ) -> anyhow::Result<LoadReport> {
        if let Some(bad) = records
            .iter()
            .find(|r| r.temperature.is_nan() || r.precipitation.is_nan())
        {
            anyhow::bail!("hour {} has a NaN value", bad.timestamp.to_rfc3339());
        }

        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;

        let mut seen: HashSet<i64> = HashSet::new();
        match mode {
            LoadMode::Replace => {
                let removed = tx.execute("DELETE FROM hours WHERE dataset_id = ?1", params![dataset.id])?;
                if removed > 0 {
                    log::info!("[WXS Debug] loader: removed {} stored hours", removed);
                }
            }
            LoadMode::SkipExisting => {
                let mut stmt = tx.prepare("SELECT timestamp FROM hours WHERE dataset_id = ?1")?;
                let rows = stmt.query_map(params![dataset.id], |row| row.get::<_, i64>(0))?;
                for ts in rows {
                    seen.insert(ts?);
                }
            }
        }

        let mut report = LoadReport::default();
        {
            let mut insert = tx.prepare(
                "INSERT INTO hours (dataset_id, timestamp, temperature, precipitation)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for r in records {
                let ts = r.timestamp.timestamp();
                if !seen.insert(ts) {
                    report.skipped += 1;
                    continue;
                }
                insert.execute(params![dataset.id, ts, r.temperature, r.precipitation])?;
                report.inserted += 1;
            }
        }
        tx.commit()?;

        log::info!(
            "[WXS Debug] loader: Loaded {} hours into {}, skipped {}",
            report.inserted,
            dataset.composite_key(),
            report.skipped
        );
        Ok(report)
    }

    /// Parse hourly CSV text and store it via [`store_hours`](Self::store_hours).
    ///
    /// # Example CSV
    /// ```text
    /// timestamp,temperature,precipitation
    /// 2024-07-01T00:00,21.4,0.0
    /// 2024-07-01T01:00,20.9,0.2
    /// ```
    pub fn load_hours_csv(
        &self,
        dataset: &Dataset,
        csv_data: &str,
        mode: LoadMode,
    ) -> anyhow::Result<LoadReport> {
        let records = parse_hours_csv(csv_data)?;
        self.store_hours(dataset, &records, mode)
    }
}

/// Parse `timestamp,temperature,precipitation` rows; errors name the offending line.
pub fn parse_hours_csv(csv_data: &str) -> anyhow::Result<Vec<HourlyRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_data.as_bytes());

    let mut records = Vec::new();
    for result in rdr.records() {
        let r = result?;
        let line = r.position().map(|p| p.line()).unwrap_or(0);
        if r.len() != 3 {
            anyhow::bail!("line {}: expected 3 fields, found {}", line, r.len());
        }
        let timestamp = parse_timestamp(&r[0])
            .map_err(|e| anyhow::anyhow!("line {}: {}", line, e))?;
        let temperature: f64 = r[1]
            .parse()
            .map_err(|_| anyhow::anyhow!("line {}: bad temperature '{}'", line, &r[1]))?;
        let precipitation: f64 = r[2]
            .parse()
            .map_err(|_| anyhow::anyhow!("line {}: bad precipitation '{}'", line, &r[2]))?;
        records.push(HourlyRecord {
            timestamp,
            temperature,
            precipitation,
        });
    }
    Ok(records)
}
