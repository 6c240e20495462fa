// Tests for event derivation from posts and the per-day filter.
use chrono::{Datelike, NaiveDate};
use diynews::calendar::{DeriveOptions, MonthGrid, derive_events, events_on};
use diynews::dates::{self, DateOverflow};
use diynews::model::{EventColor, EventOrigin, Platform, Post};
use std::collections::HashSet;

fn post(id: &str, title: &str, content: &str) -> Post {
    Post::new(id, Platform::Twitter, "author", title, content)
}

fn scheduled(id: &str, title: &str, content: &str, raw: &str) -> Post {
    let mut p = post(id, title, content);
    p.has_schedule = Some(true);
    p.schedule_date = Some(raw.to_string());
    p
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn single_text_date_uses_current_year() {
    let posts = vec![post("1", "Meeting 3/15 notes", "")];
    let events = derive_events(&posts, &HashSet::new(), &DeriveOptions::default());

    assert_eq!(events.len(), 1);
    let date = events[0].date();
    assert_eq!(date.month(), 3);
    assert_eq!(date.day(), 15);
    assert_eq!(date.year(), dates::current_year());
    assert_eq!(events[0].origin, EventOrigin::TextScan);
    assert_eq!(events[0].title, "Meeting 3/15 notes");
    assert_eq!(events[0].source, "author");
}

#[test]
fn no_dates_no_events() {
    let posts = vec![post("1", "No dates here", "Still none")];
    let events = derive_events(&posts, &HashSet::new(), &DeriveOptions::for_year(2025));
    assert!(events.is_empty());
}

#[test]
fn explicit_event_comes_first_then_scan() {
    let posts = vec![scheduled("1", "Show on 5/2", "doors 5/3", "2025-05-01T19:30:00")];
    let events = derive_events(&posts, &HashSet::new(), &DeriveOptions::for_year(2025));

    assert_eq!(events.len(), 3);
    assert_eq!(events[0].origin, EventOrigin::Explicit);
    assert_eq!(
        events[0].when,
        ymd(2025, 5, 1).and_hms_opt(19, 30, 0).unwrap()
    );
    assert_eq!(events[1].date(), ymd(2025, 5, 2));
    assert_eq!(events[2].date(), ymd(2025, 5, 3));
}

#[test]
fn unparsable_explicit_date_still_scans_text() {
    let posts = vec![scheduled("1", "Fan meeting 7/20", "", "sometime soon")];
    let events = derive_events(&posts, &HashSet::new(), &DeriveOptions::for_year(2025));

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].origin, EventOrigin::TextScan);
    assert_eq!(events[0].date(), ymd(2025, 7, 20));
}

#[test]
fn explicit_field_ignored_unless_flagged() {
    let mut p = scheduled("1", "Nothing", "", "2025-05-01");
    p.has_schedule = Some(false);
    let events = derive_events(&[p], &HashSet::new(), &DeriveOptions::for_year(2025));
    assert!(events.is_empty());

    let blank = scheduled("2", "Nothing", "", "   ");
    let events = derive_events(&[blank], &HashSet::new(), &DeriveOptions::for_year(2025));
    assert!(events.is_empty());
}

#[test]
fn event_count_is_bounded_by_sources() {
    let posts = vec![
        scheduled("1", "1/1 2/2", "3/3", "2025-06-01"),
        scheduled("2", "9/9", "", "garbage"),
        post("3", "12-24 and 12/25", "or 12/31"),
        post("4", "", ""),
    ];
    let events = derive_events(&posts, &HashSet::new(), &DeriveOptions::for_year(2025));

    for p in &posts {
        let explicit = p
            .explicit_schedule()
            .and_then(dates::parse_schedule_date)
            .map_or(0, |_| 1);
        let scanned = dates::scan_month_days(&p.scan_text()).len();
        let emitted = events.iter().filter(|e| e.post_id == p.id).count();
        assert!(emitted <= explicit + scanned, "post {}", p.id);
    }
    assert_eq!(events.len(), 4 + 1 + 3);
}

#[test]
fn colors_follow_post_index() {
    let posts: Vec<Post> = (0..7)
        .map(|i| post(&i.to_string(), &format!("{}/1 and {}/2", i + 1, i + 1), ""))
        .collect();
    let palette = EventColor::palette();
    let events = derive_events(&posts, &HashSet::new(), &DeriveOptions::for_year(2025));

    assert_eq!(events.len(), 14);
    for ev in &events {
        let index: usize = ev.post_id.parse().unwrap();
        assert_eq!(ev.color, palette[index % palette.len()]);
    }
    // Posts without events still consume their palette slot.
    let mixed = vec![post("a", "none", ""), post("b", "4/4", "")];
    let events = derive_events(&mixed, &HashSet::new(), &DeriveOptions::for_year(2025));
    assert_eq!(events[0].color, palette[1]);
}

#[test]
fn custom_palette_cycles() {
    let posts = vec![post("0", "1/1", ""), post("1", "1/2", ""), post("2", "1/3", "")];
    let mut opts = DeriveOptions::for_year(2025);
    opts.palette = vec![EventColor::Amber, EventColor::Sky];
    let events = derive_events(&posts, &HashSet::new(), &opts);
    let colors: Vec<EventColor> = events.iter().map(|e| e.color).collect();
    assert_eq!(
        colors,
        vec![EventColor::Amber, EventColor::Sky, EventColor::Amber]
    );
}

#[test]
fn derivation_is_idempotent() {
    let posts = vec![
        scheduled("1", "Live 8/15", "", "2025-08-15"),
        post("2", "Drop 9/1", "repeat 9/1"),
    ];
    let bookmarks: HashSet<String> = ["2".to_string()].into_iter().collect();
    let opts = DeriveOptions::for_year(2025);

    let first = derive_events(&posts, &bookmarks, &opts);
    let second = derive_events(&posts, &bookmarks, &opts);
    assert_eq!(first, second);
    assert!(first.iter().filter(|e| e.post_id == "2").all(|e| e.bookmarked));
    assert!(first.iter().filter(|e| e.post_id == "1").all(|e| !e.bookmarked));
}

#[test]
fn duplicates_kept_unless_dedupe() {
    let posts = vec![
        scheduled("1", "Live 8/15", "", "2025-08-15"),
        post("2", "Drop 9/1", "repeat 9/1"),
    ];
    let mut opts = DeriveOptions::for_year(2025);
    assert_eq!(derive_events(&posts, &HashSet::new(), &opts).len(), 4);

    opts.dedupe = true;
    let events = derive_events(&posts, &HashSet::new(), &opts);
    assert_eq!(events.len(), 2);
    // The explicit event wins over the scan of the same day.
    assert_eq!(events[0].origin, EventOrigin::Explicit);
}

#[test]
fn overflow_policy_applies_to_scan() {
    let posts = vec![post("1", "Deadline 2/30", "")];
    let mut opts = DeriveOptions::for_year(2025);

    let rolled = derive_events(&posts, &HashSet::new(), &opts);
    assert_eq!(rolled[0].date(), ymd(2025, 3, 2));

    opts.overflow = DateOverflow::Reject;
    assert!(derive_events(&posts, &HashSet::new(), &opts).is_empty());
}

#[test]
fn day_filter_is_exact() {
    let posts = vec![
        post("1", "3/14", ""),
        post("2", "3/15", ""),
        post("3", "3/16", ""),
        scheduled("4", "", "", "2025-03-15T23:59:00"),
        scheduled("5", "", "", "2024-03-15"),
    ];
    let events = derive_events(&posts, &HashSet::new(), &DeriveOptions::for_year(2025));
    let on = events_on(&events, ymd(2025, 3, 15));

    let ids: Vec<&str> = on.iter().map(|e| e.post_id.as_str()).collect();
    assert_eq!(ids, vec!["2", "4"]);
    assert!(on.iter().all(|e| e.date() == ymd(2025, 3, 15)));
}

#[test]
fn grid_counts_events_per_day() {
    let posts: Vec<Post> = (0..5).map(|i| post(&i.to_string(), "4/10", "")).collect();
    let events = derive_events(&posts, &HashSet::new(), &DeriveOptions::for_year(2025));
    let grid = MonthGrid::build(ymd(2025, 4, 1), &events, ymd(2025, 4, 10), None);

    let cell = grid.day(10).unwrap();
    assert!(cell.is_today);
    assert_eq!(cell.events.len(), 5);
    assert_eq!(
        cell.dots(),
        vec![EventColor::Rose, EventColor::Sky, EventColor::Emerald]
    );
    assert_eq!(cell.overflow(), 2);
    assert!(grid.day(11).unwrap().events.is_empty());
}
