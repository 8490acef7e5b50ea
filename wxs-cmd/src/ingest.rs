//! Ingestion commands: fetch from Open-Meteo or import a CSV, then store.
//!
//! Both paths end in [`store_city_hours`], which upserts the city and the
//! dataset and writes the hours in one transaction. Without `--replace`,
//! hours already stored for the dataset are kept and counted as skipped.

use crate::validate::{self, ValidationError};
use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use std::fmt;
use std::path::PathBuf;
use wxs_db::{parse_hours_csv, Database, LoadMode, LoadReport};
use wxs_meteo::city::{City, NewCity};
use wxs_meteo::dataset::Dataset;
use wxs_meteo::date_range::DateRange;
use wxs_meteo::hourly::HourlyRecord;
use wxs_meteo::open_meteo::{ClientConfig, OpenMeteoClient, ARCHIVE_URL, GEOCODING_URL, SOURCE};
use wxs_utils::dates::format_date;

/// Source tag for datasets imported from CSV files.
pub const CSV_SOURCE: &str = "csv";

#[derive(Args, Debug, Clone, PartialEq)]
pub struct LoadCityArgs {
    /// City name, e.g. Madrid
    pub city: String,

    /// Start date (YYYY-MM-DD), must be in the past
    pub start_date: String,

    /// End date (YYYY-MM-DD), must be in the past
    pub end_date: String,

    /// Country ISO code (e.g. ES, FR) to disambiguate the city
    #[arg(short = 'I', long = "country-iso")]
    pub country_iso: Option<String>,

    /// Replace the hours of an existing dataset instead of skipping stored timestamps
    #[arg(short, long)]
    pub replace: bool,

    /// Open-Meteo historical archive endpoint
    #[arg(long, default_value = ARCHIVE_URL)]
    pub archive_url: String,

    /// Open-Meteo geocoding endpoint
    #[arg(long, default_value = GEOCODING_URL)]
    pub geocoding_url: String,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ImportCsvArgs {
    /// CSV file with header `timestamp,temperature,precipitation`
    pub file: PathBuf,

    /// Start date (YYYY-MM-DD), must be in the past
    pub start_date: String,

    /// End date (YYYY-MM-DD), must be in the past
    pub end_date: String,

    #[arg(long)]
    pub city: String,

    #[arg(long)]
    pub country_code: String,

    #[arg(long, allow_negative_numbers = true)]
    pub latitude: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub longitude: f64,

    /// Country name (defaults to the country code)
    #[arg(long)]
    pub country: Option<String>,

    #[arg(long, default_value = "UTC")]
    pub timezone: String,

    /// Replace the hours of an existing dataset instead of skipping stored timestamps
    #[arg(short, long)]
    pub replace: bool,
}

/// What one ingestion run did.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub city: City,
    pub dataset: Dataset,
    pub dataset_created: bool,
    pub load: LoadReport,
    /// Rows dropped because their UTC day is outside the dataset's range
    pub outside_range: usize,
    /// Days of the range with no stored hour after the load
    pub missing_days: Vec<NaiveDate>,
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Loaded {} hourly rows for {} ({})",
            self.load.inserted, self.city.name, self.city.country_code
        )?;
        writeln!(f, "Skipped {} rows", self.load.skipped)?;
        if self.outside_range > 0 {
            writeln!(f, "Ignored {} rows outside the range", self.outside_range)?;
        }
        writeln!(
            f,
            "[{}..{}].",
            format_date(&self.dataset.start_date),
            format_date(&self.dataset.end_date)
        )?;
        write!(
            f,
            "Dataset {}.",
            if self.dataset_created { "created" } else { "updated" }
        )?;
        if !self.missing_days.is_empty() {
            let days: Vec<String> = self.missing_days.iter().map(format_date).collect();
            write!(f, "\nMissing days: {}", days.join(", "))?;
        }
        Ok(())
    }
}

/// Upsert `city` and its dataset for `range`, then store the `hours` whose
/// UTC day lies inside `range`. Hours outside it are counted, not stored.
pub fn store_city_hours(
    db: &Database,
    city: &NewCity,
    range: &DateRange,
    hours: &[HourlyRecord],
    source: &str,
    replace: bool,
) -> anyhow::Result<IngestReport> {
    let (hours, outside): (Vec<HourlyRecord>, Vec<HourlyRecord>) = hours
        .iter()
        .copied()
        .partition(|h| range.contains(h.timestamp.date_naive()));
    if !outside.is_empty() {
        log::warn!(
            "[WXS Debug] ingest: ignoring {} rows outside {}..{}",
            outside.len(),
            format_date(&range.start()),
            format_date(&range.end())
        );
    }

    let expected = 24 * range.num_days();
    if hours.len() as i64 != expected {
        log::warn!(
            "[WXS Debug] ingest: {} hours for {} days, expected {}",
            hours.len(),
            range.num_days(),
            expected
        );
    }

    let (city, _) = db.upsert_city(city)?;
    let (dataset, dataset_created) = db.upsert_dataset(&city, range, source)?;
    let mode = if replace {
        LoadMode::Replace
    } else {
        LoadMode::SkipExisting
    };
    let load = db.store_hours(&dataset, &hours, mode)?;

    let missing_days = db.missing_days(&dataset, range)?;
    if !missing_days.is_empty() {
        log::warn!(
            "[WXS Debug] ingest: {} has {} days without data",
            dataset.composite_key(),
            missing_days.len()
        );
    }

    Ok(IngestReport {
        city,
        dataset,
        dataset_created,
        load,
        outside_range: outside.len(),
        missing_days,
    })
}

/// Geocode the city, fetch its hourly archive and store it.
pub async fn load_city(
    db: &Database,
    today: NaiveDate,
    args: &LoadCityArgs,
) -> anyhow::Result<IngestReport> {
    let name = validate::city_name(&args.city)?;
    let range = validate::date_range(&args.start_date, &args.end_date, today)?;
    let country_code = args
        .country_iso
        .as_deref()
        .map(str::trim)
        .filter(|cc| !cc.is_empty())
        .map(str::to_uppercase);

    let client = OpenMeteoClient::new(ClientConfig {
        geocoding_url: args.geocoding_url.clone(),
        archive_url: args.archive_url.clone(),
        ..ClientConfig::default()
    })?;
    let weather = client
        .city_weather(&name, &range, country_code.as_deref())
        .await?;

    store_city_hours(db, &weather.city, &range, &weather.hours, SOURCE, args.replace)
}

/// Read hours from a CSV file and store them for the given city.
pub fn import_csv(
    db: &Database,
    today: NaiveDate,
    args: &ImportCsvArgs,
) -> anyhow::Result<IngestReport> {
    let name = validate::city_name(&args.city)?;
    let range = validate::date_range(&args.start_date, &args.end_date, today)?;
    let country_code = args.country_code.trim().to_uppercase();
    if country_code.is_empty() {
        return Err(ValidationError("country_code must not be empty.".to_string()).into());
    }

    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let hours = parse_hours_csv(&text)
        .with_context(|| format!("parsing {}", args.file.display()))?;

    let city = NewCity {
        name,
        latitude: args.latitude,
        longitude: args.longitude,
        country: args.country.clone().unwrap_or_else(|| country_code.clone()),
        country_code,
        timezone: args.timezone.clone(),
    };
    store_city_hours(db, &city, &range, &hours, CSV_SOURCE, args.replace)
}
