// File: ./src/display.rs
//! Human-facing labels: relative post age, event times and width-aware truncation.
use chrono::{DateTime, Datelike, Local, NaiveDateTime, TimeZone, Timelike, Utc};
use rust_i18n::t;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;
const MONTH: i64 = 2_592_000; // 30 days

/// Parses a stored timestamp. RFC 3339 first, then the naive ISO form the
/// backend writes with `datetime.isoformat()`, which is local wall-clock time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .and_then(|n| Local.from_local_datetime(&n).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

/// "just now", "5 min ago", ... relative to `now`.
///
/// Future timestamps count as just now. Unparsable input is returned as is.
pub fn relative_time(raw: &str, now: DateTime<Utc>, locale: &str) -> String {
    let Some(past) = parse_timestamp(raw) else {
        return raw.to_string();
    };
    relative_seconds((now - past).num_seconds(), locale)
}

pub fn relative_seconds(secs: i64, locale: &str) -> String {
    let label = if secs < MINUTE {
        t!("relative_just_now", locale = locale)
    } else if secs < HOUR {
        let count = secs / MINUTE;
        t!("relative_minutes", locale = locale, count = count)
    } else if secs < DAY {
        let count = secs / HOUR;
        t!("relative_hours", locale = locale, count = count)
    } else if secs < MONTH {
        let count = secs / DAY;
        t!("relative_days", locale = locale, count = count)
    } else {
        let count = secs / MONTH;
        t!("relative_months", locale = locale, count = count)
    };
    label.to_string()
}

/// Month, day and 12-hour clock time of an event, e.g. `3/15, 7:30 PM`.
pub fn event_time_label(when: NaiveDateTime, locale: &str) -> String {
    let (is_pm, hour) = when.hour12();
    let meridiem = if is_pm {
        t!("time_pm", locale = locale)
    } else {
        t!("time_am", locale = locale)
    };
    let month = when.month();
    let day = when.day();
    let minute = format!("{:02}", when.minute());
    t!(
        "event_time",
        locale = locale,
        month = month,
        day = day,
        hour = hour,
        minute = minute,
        meridiem = meridiem
    )
    .to_string()
}

/// Cuts `text` so it occupies at most `width` terminal columns, ending with `…` when cut.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
