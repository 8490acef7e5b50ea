//! Command implementations for the WXS CLI.
//!
//! Provides subcommands for ingesting hourly weather (Open-Meteo or CSV)
//! into SQLite and for computing statistics over stored datasets.
//!
//! Commands return their stdout text; the binary prints it, or prints
//! `{"detail": ...}` to stderr and exits with [`exit_code`] on failure.

use clap::{Args, Subcommand};
use std::path::PathBuf;
use wxs_db::Database;
use wxs_stats::StatsError;

pub mod ingest;
pub mod stats;
pub mod validate;

pub use validate::ValidationError;

/// Exit status for unexpected failures (storage, network, I/O).
pub const EXIT_FAILURE: i32 = 1;
/// Exit status for rejected input: bad dates, ranges, city names or thresholds.
pub const EXIT_INVALID: i32 = 2;
/// Exit status when the city or dataset is not stored.
pub const EXIT_NOT_FOUND: i32 = 3;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct GlobalArgs {
    /// SQLite database file
    #[arg(long, global = true, env = "WXS_DATABASE", default_value = "weather.sqlite3")]
    pub database: PathBuf,

    /// Reference date for "in the past" checks (YYYY-MM-DD); defaults to the local date
    #[arg(long, global = true, env = "WXS_TODAY")]
    pub today: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch hourly weather for a city from Open-Meteo and store it
    LoadCity(ingest::LoadCityArgs),

    /// Store hourly weather for a city from a local CSV file
    ImportCsv(ingest::ImportCsvArgs),

    /// Temperature statistics for one stored dataset
    Temperature(stats::TemperatureArgs),

    /// Precipitation statistics for one stored dataset
    Precipitation(stats::RangeArgs),

    /// Temperature and precipitation rollup of every stored dataset
    Summary,

    /// List stored datasets with their hour counts
    Datasets,
}

pub async fn run(global: &GlobalArgs, command: &Command) -> anyhow::Result<String> {
    let today = validate::today(global.today.as_deref())?;
    let db = Database::open(&global.database)?;
    run_with(&db, today, command).await
}

/// Run `command` against an already opened database.
pub async fn run_with(
    db: &Database,
    today: chrono::NaiveDate,
    command: &Command,
) -> anyhow::Result<String> {
    match command {
        Command::LoadCity(args) => Ok(ingest::load_city(db, today, args).await?.to_string()),
        Command::ImportCsv(args) => Ok(ingest::import_csv(db, today, args)?.to_string()),
        Command::Temperature(args) => stats::temperature(db, today, args),
        Command::Precipitation(args) => stats::precipitation(db, today, args),
        Command::Summary => stats::summary(db, today),
        Command::Datasets => stats::datasets(db),
    }
}

/// Process exit status for a failed command.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ValidationError>().is_some() {
        return EXIT_INVALID;
    }
    match err.downcast_ref::<StatsError>() {
        Some(StatsError::InvalidDateRange(_)) => EXIT_INVALID,
        Some(StatsError::DatasetNotFound(_)) => EXIT_NOT_FOUND,
        _ => EXIT_FAILURE,
    }
}

/// `{"detail": "<message>"}` for stderr.
pub fn error_body(err: &anyhow::Error) -> String {
    serde_json::json!({ "detail": format!("{:#}", err) }).to_string()
}
