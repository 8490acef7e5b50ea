//! Shared utility functions for WXS crates.

/// Date utility functions
pub mod dates {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

    /// ISO calendar date format, also used for day keys: "YYYY-MM-DD"
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Hour stamp format used when reporting extremes: "YYYY-MM-DDTHH:MM"
    pub const HOUR_STAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

    /// Naive timestamp formats accepted on import, interpreted as UTC.
    const NAIVE_TIMESTAMP_FORMATS: [&str; 3] =
        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string in strict "YYYY-MM-DD" format.
    ///
    /// Fields must be zero-padded and no surrounding whitespace is accepted.
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 10
            && bytes.iter().enumerate().all(|(i, b)| match i {
                4 | 7 => *b == b'-',
                _ => b.is_ascii_digit(),
            });
        if !well_formed {
            anyhow::bail!("date '{}' is not YYYY-MM-DD", s);
        }
        Ok(NaiveDate::parse_from_str(s, DATE_FORMAT)?)
    }

    /// The UTC calendar day of an instant, formatted as "YYYY-MM-DD".
    ///
    /// No conversion to the city's local time happens here: every "by day"
    /// aggregate buckets hours by their UTC date.
    pub fn day_key(timestamp: &DateTime<Utc>) -> String {
        timestamp.format(DATE_FORMAT).to_string()
    }

    /// Format an instant as "YYYY-MM-DDTHH:MM" (UTC, no offset suffix).
    pub fn hour_stamp(timestamp: &DateTime<Utc>) -> String {
        timestamp.format(HOUR_STAMP_FORMAT).to_string()
    }

    /// Parse a timestamp into a UTC instant.
    ///
    /// RFC 3339 strings keep their offset and are converted to UTC. Naive
    /// strings ("YYYY-MM-DDTHH:MM[:SS]" or "YYYY-MM-DD HH:MM:SS") are taken
    /// to already be UTC.
    pub fn parse_timestamp(s: &str) -> anyhow::Result<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
            return Ok(ts.with_timezone(&Utc));
        }
        for format in NAIVE_TIMESTAMP_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(naive.and_utc());
            }
        }
        anyhow::bail!("unrecognised timestamp '{}'", s)
    }

    /// Number of calendar days in `start..=end`, or 0 when `start > end`.
    pub fn days_inclusive(start: &NaiveDate, end: &NaiveDate) -> i64 {
        ((*end - *start).num_days() + 1).max(0)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{NaiveDate, TimeZone};

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
        }

        #[test]
        fn test_parse_date_rejects_garbage() {
            assert!(parse_date("15/06/2023").is_err());
            assert!(parse_date("not-a-date").is_err());
            assert!(parse_date("2023-02-30").is_err());
        }

        #[test]
        fn test_parse_date_requires_padded_iso() {
            assert!(parse_date("2024-7-1").is_err());
            assert!(parse_date("2024-07-1").is_err());
            assert!(parse_date(" 2024-07-01").is_err());
            assert!(parse_date("2024-07-01 ").is_err());
            assert!(parse_date("+2024-07-01").is_err());
            assert!(parse_date("2024/07/01").is_err());
        }

        #[test]
        fn test_day_key_uses_utc_date() {
            let late = Utc.with_ymd_and_hms(2024, 7, 1, 23, 59, 0).unwrap();
            assert_eq!(day_key(&late), "2024-07-01");
            let midnight = Utc.with_ymd_and_hms(2024, 7, 2, 0, 0, 0).unwrap();
            assert_eq!(day_key(&midnight), "2024-07-02");
        }

        #[test]
        fn test_hour_stamp_has_no_offset() {
            let ts = Utc.with_ymd_and_hms(2024, 7, 1, 15, 0, 0).unwrap();
            assert_eq!(hour_stamp(&ts), "2024-07-01T15:00");
        }

        #[test]
        fn test_parse_timestamp_normalizes_offsets() {
            let ts = parse_timestamp("2024-07-01T02:00:00+02:00").unwrap();
            assert_eq!(ts, Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap());

            let zulu = parse_timestamp("2024-07-01T10:00:00Z").unwrap();
            assert_eq!(zulu, Utc.with_ymd_and_hms(2024, 7, 1, 10, 0, 0).unwrap());
        }

        #[test]
        fn test_parse_timestamp_naive_is_utc() {
            let expected = Utc.with_ymd_and_hms(2024, 7, 1, 10, 0, 0).unwrap();
            assert_eq!(parse_timestamp("2024-07-01T10:00").unwrap(), expected);
            assert_eq!(parse_timestamp("2024-07-01T10:00:00").unwrap(), expected);
            assert_eq!(parse_timestamp("2024-07-01 10:00:00").unwrap(), expected);
            assert!(parse_timestamp("yesterday").is_err());
        }

        #[test]
        fn test_days_inclusive() {
            let start = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
            let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
            assert_eq!(days_inclusive(&start, &end), 4); // leap year
            assert_eq!(days_inclusive(&start, &start), 1);
            assert_eq!(days_inclusive(&end, &start), 0);
        }
    }
}
