//! The storage contract the statistics engine reads through.

use wxs_meteo::city::City;
use wxs_meteo::dataset::Dataset;
use wxs_meteo::date_range::DateRange;
use wxs_meteo::hourly::HourlyRecord;

/// Read-only lookups over stored cities, datasets and hours.
///
/// Implemented by the SQLite database in `wxs-db`; any failure is reported
/// as an opaque `anyhow::Error` and surfaces as [`crate::StatsError::Storage`].
pub trait WeatherStore {
    /// First city whose name matches `name` ignoring case.
    fn find_city(&self, name: &str) -> anyhow::Result<Option<City>>;

    /// The dataset for exactly this city and range, if ingested.
    fn find_dataset(&self, city: &City, range: &DateRange) -> anyhow::Result<Option<Dataset>>;

    /// Every stored dataset, each carrying its city's name.
    fn list_datasets(&self) -> anyhow::Result<Vec<Dataset>>;

    /// All hours of a dataset, ascending by timestamp.
    fn load_hours(&self, dataset: &Dataset) -> anyhow::Result<Vec<HourlyRecord>>;
}
