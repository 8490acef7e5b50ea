use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;
use std::mem::replace;
use thiserror::Error;
use wxs_utils::dates::days_inclusive;

/// Why a pair of dates is not an acceptable range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeViolation {
    #[error("start_date must be <= end_date")]
    StartAfterEnd,
    #[error("end_date must be in the past (today is {today})")]
    NotInPast { today: NaiveDate },
}

/// An inclusive calendar range lying strictly before a reference date.
///
/// Only constructed through [`DateRange::in_past`], so `start <= end` and
/// `end < today` hold for every value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Validate `start..=end` against the caller's reference `today`.
    pub fn in_past(
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Result<Self, RangeViolation> {
        if start > end {
            return Err(RangeViolation::StartAfterEnd);
        }
        if end >= today {
            return Err(RangeViolation::NotInPast { today });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn num_days(&self) -> i64 {
        days_inclusive(&self.start, &self.end)
    }

    /// Whether `date` lies within `start..=end`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date from start through end (inclusive).
    pub fn days(&self) -> Days {
        Days(self.start, self.end)
    }
}

/// A date iterator that yields each date from the start date
/// through the end date (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct Days(NaiveDate, NaiveDate);

impl Iterator for Days {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 <= self.1 {
            let next = self.0 + TimeDelta::days(1);
            Some(replace(&mut self.0, next))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_in_past_accepts_valid_range() {
        let range = DateRange::in_past(d(2024, 7, 1), d(2024, 7, 3), d(2024, 8, 1)).unwrap();
        assert_eq!(range.start(), d(2024, 7, 1));
        assert_eq!(range.end(), d(2024, 7, 3));
        assert_eq!(range.num_days(), 3);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::in_past(d(2024, 7, 1), d(2024, 7, 2), d(2024, 8, 1)).unwrap();
        assert!(range.contains(d(2024, 7, 1)));
        assert!(range.contains(d(2024, 7, 2)));
        assert!(!range.contains(d(2024, 6, 30)));
        assert!(!range.contains(d(2024, 7, 3)));
    }

    #[test]
    fn test_in_past_rejects_reversed_range() {
        let err = DateRange::in_past(d(2024, 7, 3), d(2024, 7, 1), d(2024, 8, 1)).unwrap_err();
        assert_eq!(err, RangeViolation::StartAfterEnd);
        assert_eq!(err.to_string(), "start_date must be <= end_date");
    }

    #[test]
    fn test_in_past_rejects_today_and_future() {
        let today = d(2024, 8, 1);
        let err = DateRange::in_past(d(2024, 7, 1), today, today).unwrap_err();
        assert_eq!(
            err.to_string(),
            "end_date must be in the past (today is 2024-08-01)"
        );
        assert!(DateRange::in_past(d(2024, 7, 1), d(2024, 9, 1), today).is_err());
        assert!(DateRange::in_past(d(2024, 7, 1), d(2024, 7, 31), today).is_ok());
    }

    #[test]
    fn test_days_iteration() {
        let range = DateRange::in_past(d(2022, 1, 1), d(2022, 1, 5), d(2023, 1, 1)).unwrap();
        let dates: Vec<NaiveDate> = range.days().collect();
        assert_eq!(dates.len(), 5);
        assert_eq!(dates[0], d(2022, 1, 1));
        assert_eq!(dates[4], d(2022, 1, 5));
    }

    #[test]
    fn test_days_single_day() {
        let range = DateRange::in_past(d(2022, 3, 15), d(2022, 3, 15), d(2023, 1, 1)).unwrap();
        let dates: Vec<NaiveDate> = range.days().collect();
        assert_eq!(dates, vec![d(2022, 3, 15)]);
        assert_eq!(range.num_days(), 1);
    }
}
