// File: ./src/dates.rs
//! Date candidates found in post text and explicit schedule strings.
//!
//! Text scanning only yields raw `(month, day)` numbers; turning them into a
//! calendar date is a separate step that takes the year explicitly, so the
//! "current year" assumption lives with the caller.
use chrono::{
    DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static MONTH_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,2})[/-]([0-9]{1,2})").expect("valid month/day regex"));

// "2025. 3. 15." as produced by Korean locale date formatting.
static KO_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})\.\s*(\d{1,2})\.\s*(\d{1,2})\.?$").expect("valid ko date regex")
});

/// How out-of-range month/day pairs from the text scanner are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateOverflow {
    /// Carry overflow into the next month/year ("2/30" is early March).
    #[default]
    Rollover,
    /// Drop pairs that are not a real calendar date.
    Reject,
}

/// All `(month, day)` pairs matching `d{1,2}[/-]d{1,2}`, left to right.
/// Only ASCII digits count.
pub fn scan_month_days(text: &str) -> Vec<(u32, u32)> {
    MONTH_DAY
        .captures_iter(text)
        .filter_map(|c| {
            let month = c.get(1)?.as_str().parse().ok()?;
            let day = c.get(2)?.as_str().parse().ok()?;
            Some((month, day))
        })
        .collect()
}

/// Resolves a scanned month/day pair in `year`.
///
/// With `Rollover`, month 13 is January of the next year, month 0 is the
/// previous December, and surplus days spill into the following month.
pub fn resolve_month_day(
    year: i32,
    month: u32,
    day: u32,
    overflow: DateOverflow,
) -> Option<NaiveDate> {
    match overflow {
        DateOverflow::Reject => NaiveDate::from_ymd_opt(year, month, day),
        DateOverflow::Rollover => {
            let month0 = month as i32 - 1;
            let y = year + month0.div_euclid(12);
            let m = month0.rem_euclid(12) as u32 + 1;
            let first = NaiveDate::from_ymd_opt(y, m, 1)?;
            first.checked_add_signed(Duration::days(day as i64 - 1))
        }
    }
}

/// Scans `text` and resolves every candidate in `year`. Rejected
/// candidates are dropped.
pub fn extract_dates(text: &str, year: i32, overflow: DateOverflow) -> Vec<NaiveDate> {
    scan_month_days(text)
        .into_iter()
        .filter_map(|(m, d)| {
            let resolved = resolve_month_day(year, m, d, overflow);
            if resolved.is_none() {
                log::debug!("Discarding date candidate {}/{} in {}", m, d, year);
            }
            resolved
        })
        .collect()
}

/// Parses an explicit schedule string into a local date-time.
///
/// Accepted forms: RFC 3339, RFC 2822, `YYYY-MM-DD`, `YYYY/MM/DD`,
/// `YYYY-MM-DD[T ]HH:MM[:SS]` and `YYYY. M. D.`. Zoned values are converted
/// to local time.
///
/// Date-only values are placed at local midnight, not UTC midnight, so the
/// stored day is the calendar day shown whatever the local offset.
pub fn parse_schedule_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(to_local_naive(dt.with_timezone(&chrono::Utc)));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(to_local_naive(dt.with_timezone(&chrono::Utc)));
    }

    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }

    if let Some(c) = KO_DATE.captures(s) {
        let y = c.get(1)?.as_str().parse().ok()?;
        let m = c.get(2)?.as_str().parse().ok()?;
        let d = c.get(3)?.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(y, m, d).map(|d| d.and_time(NaiveTime::MIN));
    }

    None
}

/// The scan year used by the dashboard: the current local calendar year.
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Local wall-clock for a UTC instant.
pub fn to_local_naive(dt: DateTime<chrono::Utc>) -> NaiveDateTime {
    Local.from_utc_datetime(&dt.naive_utc()).naive_local()
}
