//! Conversion between q's epoch-relative temporal integers and the
//! universal (calendar) representation.
//!
//! q counts dates and timestamps from 2000-01-01, not the Unix epoch.
//! Converting to [`chrono`]'s proleptic-Gregorian types is a fixed offset
//! away, but the null sentinel must map to `None` rather than to some
//! nearby date, so every conversion here returns an `Option`.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::registry::{is_null_f64, NULL_I32, NULL_I64};

/// The universal (calendar) form of a decoded temporal value. `None`
/// marks the q-null of that type.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UniversalTemporal {
    Month(Option<NaiveDate>),
    Date(Option<NaiveDate>),
    Datetime(Option<NaiveDateTime>),
    Timestamp(Option<NaiveDateTime>),
    Timespan(Option<Duration>),
    Minute(Option<Duration>),
    Second(Option<Duration>),
    Time(Option<Duration>),
}

fn q_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).expect("2000-01-01 is a valid calendar date")
}

fn q_epoch_datetime() -> NaiveDateTime {
    q_epoch().and_hms_opt(0, 0, 0).expect("midnight is a valid time")
}

/// `r` months since 2000-01, as the first day of the resulting month.
pub fn month_to_universal(r: i32) -> Option<NaiveDate> {
    if r == NULL_I32 {
        return None;
    }
    let total_months = 2000 * 12 + r;
    let year = total_months.div_euclid(12);
    let month = total_months.rem_euclid(12) + 1;
    NaiveDate::from_ymd_opt(year, month as u32, 1)
}

/// `r` days since 2000-01-01.
pub fn date_to_universal(r: i32) -> Option<NaiveDate> {
    if r == NULL_I32 {
        return None;
    }
    q_epoch().checked_add_signed(Duration::days(r as i64))
}

/// `r` IEEE-754 days (fractional) since 2000-01-01, q's legacy `datetime`
/// type. NaN is the null sentinel.
pub fn datetime_to_universal(r: f64) -> Option<NaiveDateTime> {
    if is_null_f64(r) {
        return None;
    }
    let millis = (r * 86_400_000.0).round() as i64;
    q_epoch_datetime().checked_add_signed(Duration::milliseconds(millis))
}

/// `r` nanoseconds since 2000-01-01T00:00:00.
pub fn timestamp_to_universal(r: i64) -> Option<NaiveDateTime> {
    if r == NULL_I64 {
        return None;
    }
    q_epoch_datetime().checked_add_signed(Duration::nanoseconds(r))
}

/// `r` nanoseconds, a duration rather than a point in time.
pub fn timespan_to_universal(r: i64) -> Option<Duration> {
    if r == NULL_I64 {
        return None;
    }
    Some(Duration::nanoseconds(r))
}

/// `r` minutes, a duration.
pub fn minute_to_universal(r: i32) -> Option<Duration> {
    if r == NULL_I32 {
        return None;
    }
    Some(Duration::minutes(r as i64))
}

/// `r` seconds, a duration.
pub fn second_to_universal(r: i32) -> Option<Duration> {
    if r == NULL_I32 {
        return None;
    }
    Some(Duration::seconds(r as i64))
}

/// `r` milliseconds, a duration.
pub fn time_to_universal(r: i32) -> Option<Duration> {
    if r == NULL_I32 {
        return None;
    }
    Some(Duration::milliseconds(r as i64))
}
