//! TLE epochs and wall-clock timestamps for propagated samples.
//!
//! The numerical core works in seconds since the TLE epoch. Calendar time only
//! appears at the boundary, when samples are labelled for collaborators.

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};

use crate::types::SECONDS_PER_DAY;

/// Two-digit TLE years at or above this pivot belong to the 1900s.
pub const TLE_YEAR_PIVOT: i32 = 57;

/// Expand a two-digit TLE year (57–99 → 1957–1999, 00–56 → 2000–2056).
pub fn expand_tle_year(two_digit: i32) -> i32 {
    if two_digit >= TLE_YEAR_PIVOT {
        1900 + two_digit
    } else {
        2000 + two_digit
    }
}

/// Build a UTC instant from a year and a fractional day-of-year (1.0 = Jan 1 00:00).
///
/// Returns `None` for days outside that year.
pub fn epoch_from_year_day(year: i32, day_of_year: f64) -> Option<DateTime<Utc>> {
    if !day_of_year.is_finite() || day_of_year < 1.0 {
        return None;
    }
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?.and_utc();
    let days_in_year = if NaiveDate::from_ymd_opt(year, 2, 29).is_some() { 366.0 } else { 365.0 };
    if day_of_year >= days_in_year + 1.0 {
        return None;
    }
    jan_first.checked_add_signed(seconds_to_duration((day_of_year - 1.0) * SECONDS_PER_DAY)?)
}

/// Parse the `YYDDD.DDDDDDDD` epoch field of TLE line 1.
pub fn parse_tle_epoch(field: &str) -> Option<DateTime<Utc>> {
    let field = field.trim();
    let year = field.get(0..2)?.parse::<i32>().ok()?;
    let day = field.get(2..)?.parse::<f64>().ok()?;
    epoch_from_year_day(expand_tle_year(year), day)
}

/// Convert fractional seconds to a microsecond-resolution duration.
pub fn seconds_to_duration(seconds: f64) -> Option<Duration> {
    let micros = (seconds * 1e6).round();
    if !micros.is_finite() || micros.abs() > i64::MAX as f64 {
        return None;
    }
    Some(Duration::microseconds(micros as i64))
}

/// The instant `seconds` after `anchor`, or `None` on overflow.
pub fn offset(anchor: DateTime<Utc>, seconds: f64) -> Option<DateTime<Utc>> {
    anchor.checked_add_signed(seconds_to_duration(seconds)?)
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn to_iso8601(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
