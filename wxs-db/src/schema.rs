//! SQL schema definitions for the SQLite database.
//!
//! The schema is applied as a single batch when the database is opened.

/// Returns the full SQL schema as a single batch string.
///
/// This creates the following tables:
///
/// - `cities` - City metadata (name, coordinates, country, timezone)
/// - `datasets` - One row per ingested (city, start_date, end_date); dates are ISO text
/// - `hours` - Hourly temperature (°C) and precipitation (mm); `timestamp` is UTC epoch seconds
///
/// Deleting a city removes its datasets, and deleting a dataset removes its hours.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS cities (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL,
        country_code TEXT NOT NULL,
        country TEXT NOT NULL,
        timezone TEXT NOT NULL,
        UNIQUE (name, country_code)
    );
    CREATE INDEX IF NOT EXISTS idx_cities_name ON cities(name COLLATE NOCASE);
    CREATE INDEX IF NOT EXISTS idx_cities_lat_lon ON cities(latitude, longitude);

    CREATE TABLE IF NOT EXISTS datasets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        city_id INTEGER NOT NULL REFERENCES cities(id) ON DELETE CASCADE,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        created_at TEXT NOT NULL,
        source TEXT NOT NULL,
        UNIQUE (city_id, start_date, end_date)
    );
    CREATE INDEX IF NOT EXISTS idx_datasets_city_range ON datasets(city_id, start_date, end_date);

    CREATE TABLE IF NOT EXISTS hours (
        dataset_id INTEGER NOT NULL REFERENCES datasets(id) ON DELETE CASCADE,
        timestamp INTEGER NOT NULL,
        temperature REAL NOT NULL,
        precipitation REAL NOT NULL,
        PRIMARY KEY (dataset_id, timestamp)
    );
    CREATE INDEX IF NOT EXISTS idx_hours_dataset_ts ON hours(dataset_id, timestamp);
    "#
}
