use chrono::NaiveDate;
use serde::Serialize;
use wxs_utils::dates::format_date;

/// Hourly observations for one city over one fixed date range.
///
/// A `(city_id, start_date, end_date)` triple identifies at most one dataset.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Dataset {
    pub id: i64,
    pub city_id: i64,
    pub city_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// RFC 3339 creation instant
    pub created_at: String,
    /// Where the hours came from, e.g. "open-meteo" or "csv"
    pub source: String,
}

impl Dataset {
    /// Key used in summaries: `"<city> (<start>..<end>)"`.
    ///
    /// Unique across datasets because a city cannot hold two datasets
    /// with the same range.
    pub fn composite_key(&self) -> String {
        format!(
            "{} ({}..{})",
            self.city_name,
            format_date(&self.start_date),
            format_date(&self.end_date)
        )
    }
}
