use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One hour of observations as stored for a dataset.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct HourlyRecord {
    pub timestamp: DateTime<Utc>,
    /// Air temperature at 2 m, degrees Celsius
    pub temperature: f64,
    /// Precipitation over the hour, millimetres
    pub precipitation: f64,
}
