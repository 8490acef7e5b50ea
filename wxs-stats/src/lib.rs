//! Statistics engine for stored hourly weather datasets.
//!
//! A request flows through the [`resolver`] (validate the range, find the
//! dataset), the [`series`] loader (UTC day-tagged hours, ascending), and
//! one of the aggregators:
//!
//! - [`temperature`] - mean, per-day mean, extremes, threshold counts
//! - [`precipitation`] - totals, per-day totals, wet days, wettest day
//! - [`summary`] - both of the above for every stored dataset
//!
//! Storage is reached only through the [`WeatherStore`] trait. Aggregation
//! is pure and synchronous; nothing is cached between calls.
//!
//! # Tie-breaking
//!
//! Extremes are picked by a forward scan that only replaces the current
//! candidate on a strict improvement, so the earliest hour (or day) wins
//! every tie.

pub mod error;
pub mod precipitation;
pub mod resolver;
pub mod series;
pub mod service;
pub mod store;
pub mod summary;
pub mod temperature;

#[cfg(test)]
mod test_store;

pub use error::{Result, StatsError};
pub use resolver::DateInput;
pub use service::{PrecipitationResponse, StatsService, TemperatureResponse};
pub use store::WeatherStore;
pub use temperature::Thresholds;
