//! Statistics commands. Each returns the response as pretty-printed JSON.

use crate::validate;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use wxs_db::Database;
use wxs_stats::temperature::{DEFAULT_ABOVE, DEFAULT_BELOW};
use wxs_stats::{DateInput, StatsService};

#[derive(Args, Debug, Clone, PartialEq)]
pub struct RangeArgs {
    /// City name (case-insensitive)
    #[arg(long)]
    pub city: String,

    /// First day of the dataset (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: String,

    /// Last day of the dataset (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: String,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct TemperatureArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Count hours strictly above this temperature (°C)
    #[arg(long, default_value_t = DEFAULT_ABOVE, allow_negative_numbers = true)]
    pub above: f64,

    /// Count hours strictly below this temperature (°C)
    #[arg(long, default_value_t = DEFAULT_BELOW, allow_negative_numbers = true)]
    pub below: f64,
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Validated `(city, start, end)` ready for the service.
fn checked_range(
    args: &RangeArgs,
    today: NaiveDate,
) -> anyhow::Result<(String, DateInput, DateInput)> {
    let city = validate::city_name(&args.city)?;
    let range = validate::date_range(&args.start_date, &args.end_date, today)?;
    Ok((city, range.start().into(), range.end().into()))
}

pub fn temperature(db: &Database, today: NaiveDate, args: &TemperatureArgs) -> anyhow::Result<String> {
    let (city, start, end) = checked_range(&args.range, today)?;
    let thresholds = validate::thresholds(args.above, args.below)?;
    let response = StatsService::new(db, today).temperature_stats(&city, &start, &end, thresholds)?;
    to_json(&response)
}

pub fn precipitation(db: &Database, today: NaiveDate, args: &RangeArgs) -> anyhow::Result<String> {
    let (city, start, end) = checked_range(args, today)?;
    let response = StatsService::new(db, today).precipitation_stats(&city, &start, &end)?;
    to_json(&response)
}

pub fn summary(db: &Database, today: NaiveDate) -> anyhow::Result<String> {
    let summary = StatsService::new(db, today).summary_stats()?;
    to_json(&summary)
}

/// Every stored dataset with its hour count.
pub fn datasets(db: &Database) -> anyhow::Result<String> {
    to_json(&db.list_dataset_infos()?)
}
