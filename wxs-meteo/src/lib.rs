//! Core weather records shared by the storage, statistics and command crates.
//!
//! - [`city`] - geocoded city metadata
//! - [`dataset`] - one city over one fixed, past date range
//! - [`hourly`] - a single stored hourly observation
//! - [`date_range`] - validated calendar ranges
//! - [`open_meteo`] - Open-Meteo geocoding/archive parsing, plus the HTTP
//!   client behind the `api` feature

pub mod city;
pub mod dataset;
pub mod date_range;
pub mod hourly;
pub mod open_meteo;
