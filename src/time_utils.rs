// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.
//!
//! All gameplay clocks run on UTC calendar days: streaks compare dates
//! with the time of day stripped, and leaderboard weeks start on Monday.

use chrono::{DateTime, Datelike, Days, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
///
/// Second precision, fixed width, so stored strings sort chronologically.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// The UTC calendar date of an instant (time of day stripped).
pub fn utc_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// Monday 00:00 of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// Sunday of the week starting at `start` (inclusive end of the week).
pub fn week_end(start: NaiveDate) -> NaiveDate {
    start + Days::new(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339_is_fixed_width() {
        let date = DateTime::from_timestamp(1_704_103_200, 123_456_789).unwrap();
        assert_eq!(format_utc_rfc3339(date), "2024-01-01T10:00:00Z");
    }

    // Pins the Monday week-start convention.
    #[test]
    fn week_starts_monday() {
        // 2024-01-17 is a Wednesday
        let wed = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();
        assert_eq!(week_start(wed), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        // A Monday maps to itself
        let mon = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(week_start(mon), mon);

        // A Sunday belongs to the week that started six days earlier
        let sun = NaiveDate::from_ymd_opt(2024, 1, 21).unwrap();
        assert_eq!(week_start(sun), mon);
    }

    #[test]
    fn test_week_end() {
        let mon = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(week_end(mon), NaiveDate::from_ymd_opt(2024, 1, 21).unwrap());
    }
}
