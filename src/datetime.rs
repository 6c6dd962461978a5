//! Date and time normalization helpers.
//!
//! The interpreter produces calendar dates and wall-clock times as separate
//! optional fields; these helpers anchor them into concrete UTC instants.
//! A date with no time is anchored at noon UTC so that small timezone
//! offsets in either direction cannot shift it onto a different calendar
//! day when rendered back to the user.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{AiError, Result};

/// Hour used to anchor date-only values, chosen so a +/-11h offset
/// still renders the same calendar day.
const DATE_ONLY_ANCHOR_HOUR: u32 = 12;

/// Combine an optional date and optional time into a UTC instant.
///
/// - Both present: the naive combination is interpreted as UTC.
/// - Date only: anchored at 12:00:00 UTC.
/// - No date: `None`, regardless of any time component (a bare time with
///   no date is not a schedulable instant).
pub fn combine_date_and_time(
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
) -> Option<DateTime<Utc>> {
    let date = date?;
    let time = time.unwrap_or_else(|| {
        NaiveTime::from_hms_opt(DATE_ONLY_ANCHOR_HOUR, 0, 0)
            .unwrap_or(NaiveTime::MIN)
    });
    Some(Utc.from_utc_datetime(&date.and_time(time)))
}

/// Parse an IANA timezone name such as `"America/New_York"`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| AiError::ConfigError(format!("invalid timezone: {name}")))
}

/// Format the current instant in the given timezone, offset included,
/// e.g. `2026-08-30T09:15:00-04:00`. This is what the interpreter prompt
/// receives as "now" so relative dates resolve in the user's local frame.
pub fn now_in_timezone(tz: Tz) -> String {
    Utc::now()
        .with_timezone(&tz)
        .format("%Y-%m-%dT%H:%M:%S%:z")
        .to_string()
}

/// Today's calendar date in the given timezone.
pub fn today_in_timezone(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}
