//! SQLite storage layer for cities, weather datasets and hourly observations.
//!
//! This crate is the storage collaborator behind the statistics engine: it
//! implements [`wxs_stats::WeatherStore`] and provides the loaders used by
//! the ingestion commands.
//!
//! # Architecture
//!
//! - `Rc<RefCell<Connection>>` wrapper, cheap to clone, single-threaded
//! - In-memory SQLite for tests, file-backed SQLite for the CLI
//! - Loaders accept fetched records or CSV text; writes run in one transaction
//! - Typed query methods returning the records from `wxs-meteo`
//!
//! # Usage
//!
//! ```rust
//! use wxs_db::{Database, LoadMode};
//! use wxs_meteo::city::NewCity;
//! use wxs_meteo::date_range::DateRange;
//! use chrono::NaiveDate;
//!
//! let db = Database::new().unwrap();
//! let (madrid, _) = db.upsert_city(&NewCity {
//!     name: "Madrid".into(),
//!     latitude: 40.4165,
//!     longitude: -3.70256,
//!     country_code: "ES".into(),
//!     country: "Spain".into(),
//!     timezone: "Europe/Madrid".into(),
//! }).unwrap();
//! let day = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
//! let range = DateRange::in_past(day, day, NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()).unwrap();
//! let (dataset, _) = db.upsert_dataset(&madrid, &range, "csv").unwrap();
//! db.load_hours_csv(&dataset, "timestamp,temperature,precipitation\n2024-07-01T12:00,31.5,0.0\n", LoadMode::Replace).unwrap();
//! assert_eq!(db.count_hours(&dataset).unwrap(), 1);
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.
//!
//! - `cities` - geocoded city metadata, unique on `(name, country_code)`
//! - `datasets` - one city over one date range, unique on `(city_id, start_date, end_date)`
//! - `hours` - hourly temperature/precipitation, unique on `(dataset_id, timestamp)`

mod loader;
pub mod models;
mod queries;
pub mod schema;

pub use loader::parse_hours_csv;
pub use models::{DatasetInfo, LoadMode, LoadReport};

use rusqlite::Connection;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// SQLite database holding cities, datasets and hours.
///
/// This struct is cheaply cloneable (via `Rc`); clones share one connection.
///
/// # Example
///
/// ```rust
/// use wxs_db::Database;
///
/// let db = Database::new().unwrap();
/// assert!(db.list_datasets().unwrap().is_empty());
/// ```
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    pub fn new() -> anyhow::Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Open (or create) a database file and apply the schema.
    ///
    /// The schema uses `IF NOT EXISTS`, so reopening an existing file is safe.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        log::info!("[WXS Debug] db: opening {}", path.display());
        Self::init(Connection::open(path)?)
    }

    fn init(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}
