// File: ./src/calendar.rs
//! Calendar event derivation and the month grid built on top of it.
use crate::dates::{self, DateOverflow};
use crate::model::{EventColor, EventOrigin, Post, ScheduledEvent};
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveTime};
use std::collections::HashSet;

pub const GRID_CELLS: usize = 35;
pub const MAX_DOTS: usize = 3;

/// Parameters of one derivation pass.
#[derive(Debug, Clone)]
pub struct DeriveOptions {
    /// Year assigned to text-scan candidates.
    pub year: i32,
    pub overflow: DateOverflow,
    pub palette: Vec<EventColor>,
    /// Collapse events of the same post that land on the same day.
    pub dedupe: bool,
}

impl DeriveOptions {
    pub fn for_year(year: i32) -> Self {
        Self {
            year,
            overflow: DateOverflow::default(),
            palette: EventColor::palette(),
            dedupe: false,
        }
    }
}

impl Default for DeriveOptions {
    fn default() -> Self {
        Self::for_year(dates::current_year())
    }
}

/// Derives the scheduled events of `posts`, in post order.
///
/// Per post, the explicit schedule field (when flagged and parseable)
/// contributes one event, then every text-scan match of title and body
/// contributes one more. A failed explicit parse is skipped, it does not
/// replace the scan. All events of the post at index `i` share
/// `palette[i % palette.len()]`.
pub fn derive_events(
    posts: &[Post],
    bookmarks: &HashSet<String>,
    opts: &DeriveOptions,
) -> Vec<ScheduledEvent> {
    let mut events = Vec::new();

    for (index, post) in posts.iter().enumerate() {
        let color = EventColor::for_index(&opts.palette, index);
        let bookmarked = bookmarks.contains(&post.id);
        let make = |when, origin| ScheduledEvent {
            when,
            title: post.title.clone(),
            source: post.author.clone(),
            post_id: post.id.clone(),
            bookmarked,
            color,
            origin,
        };

        let start = events.len();

        if let Some(raw) = post.explicit_schedule() {
            match dates::parse_schedule_date(raw) {
                Some(when) => events.push(make(when, EventOrigin::Explicit)),
                None => log::debug!(
                    "Unparsable schedule date '{}' on post {}",
                    raw,
                    post.id
                ),
            }
        }

        for date in dates::extract_dates(&post.scan_text(), opts.year, opts.overflow) {
            events.push(make(date.and_time(NaiveTime::MIN), EventOrigin::TextScan));
        }

        if opts.dedupe {
            let mut seen = HashSet::new();
            let mut i = start;
            while i < events.len() {
                if seen.insert(events[i].date()) {
                    i += 1;
                } else {
                    events.remove(i);
                }
            }
        }
    }

    events
}

/// Events whose (day, month, year) equals `date`. No range logic.
pub fn events_on(events: &[ScheduledEvent], date: NaiveDate) -> Vec<ScheduledEvent> {
    events.iter().filter(|e| e.is_on(date)).cloned().collect()
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn days_in_month(month: NaiveDate) -> u32 {
    let first = month_start(month);
    first
        .checked_add_months(Months::new(1))
        .map(|next| (next - first).num_days() as u32)
        .unwrap_or(31)
}

pub fn previous_month(month: NaiveDate) -> NaiveDate {
    let first = month_start(month);
    first.checked_sub_months(Months::new(1)).unwrap_or(first)
}

pub fn next_month(month: NaiveDate) -> NaiveDate {
    let first = month_start(month);
    first.checked_add_months(Months::new(1)).unwrap_or(first)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub events: Vec<ScheduledEvent>,
    pub is_today: bool,
    pub is_selected: bool,
}

impl DayCell {
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    /// Colours of the first few events, as drawn under the day number.
    pub fn dots(&self) -> Vec<EventColor> {
        self.events.iter().take(MAX_DOTS).map(|e| e.color).collect()
    }

    /// Number of events beyond the drawn dots.
    pub fn overflow(&self) -> usize {
        self.events.len().saturating_sub(MAX_DOTS)
    }
}

/// A Sunday-first, five-week view of one month.
///
/// Cells before the first day and after the last day are `None`. Months
/// that need a sixth row lose their trailing days, as the dashboard does.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub month: NaiveDate,
    pub cells: Vec<Option<DayCell>>,
}

impl MonthGrid {
    pub fn build(
        month: NaiveDate,
        events: &[ScheduledEvent],
        today: NaiveDate,
        selected: Option<NaiveDate>,
    ) -> Self {
        let first = month_start(month);
        let start_day = first.weekday().num_days_from_sunday() as i64;
        let days = days_in_month(first) as i64;

        let cells = (0..GRID_CELLS as i64)
            .map(|i| {
                let day_number = i - start_day + 1;
                if day_number < 1 || day_number > days {
                    return None;
                }
                let date = first + Duration::days(day_number - 1);
                Some(DayCell {
                    date,
                    events: events_on(events, date),
                    is_today: date == today,
                    is_selected: selected == Some(date),
                })
            })
            .collect();

        Self { month: first, cells }
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[Option<DayCell>]> {
        self.cells.chunks(7)
    }

    pub fn day(&self, day: u32) -> Option<&DayCell> {
        self.cells.iter().flatten().find(|c| c.day() == day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_helpers() {
        assert_eq!(days_in_month(ymd(2024, 2, 10)), 29);
        assert_eq!(days_in_month(ymd(2025, 2, 1)), 28);
        assert_eq!(days_in_month(ymd(2025, 12, 31)), 31);
        assert_eq!(previous_month(ymd(2025, 1, 20)), ymd(2024, 12, 1));
        assert_eq!(next_month(ymd(2025, 12, 20)), ymd(2026, 1, 1));
    }

    #[test]
    fn grid_offsets_first_day_by_weekday() {
        // March 2025 starts on a Saturday.
        let grid = MonthGrid::build(ymd(2025, 3, 1), &[], ymd(2025, 3, 3), None);
        assert_eq!(grid.cells.len(), GRID_CELLS);
        assert!(grid.cells[..6].iter().all(Option::is_none));
        assert_eq!(grid.cells[6].as_ref().map(DayCell::day), Some(1));
        assert!(grid.day(3).unwrap().is_today);
        // 6 leading blanks + 31 days do not fit in 35 cells.
        assert!(grid.day(30).is_none());
    }

    #[test]
    fn dots_cap_at_three() {
        let mut post = Post::new("p", crate::model::Platform::Blog, "a", "1/5 1/5 1/5 1/5", "");
        post.content = "1-5".to_string();
        let events = derive_events(&[post], &HashSet::new(), &DeriveOptions::for_year(2025));
        let grid = MonthGrid::build(ymd(2025, 1, 1), &events, ymd(2025, 1, 1), Some(ymd(2025, 1, 5)));
        let cell = grid.day(5).unwrap();
        assert_eq!(cell.events.len(), 5);
        assert_eq!(cell.dots().len(), 3);
        assert_eq!(cell.overflow(), 2);
        assert!(cell.is_selected);
    }
}
