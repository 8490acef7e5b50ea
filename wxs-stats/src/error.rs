use thiserror::Error;
use wxs_meteo::date_range::RangeViolation;

/// Errors raised while resolving a statistics request.
///
/// Aggregators never fail; only resolution (bad input, unknown data) and the
/// storage collaborator can.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Unparsable date, `start > end`, or `end` not strictly before today.
    #[error("{0}")]
    InvalidDateRange(String),

    /// Unknown city, or no dataset for the exact (city, start, end) triple.
    #[error("{0}")]
    DatasetNotFound(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<RangeViolation> for StatsError {
    fn from(violation: RangeViolation) -> Self {
        StatsError::InvalidDateRange(violation.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
