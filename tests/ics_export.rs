// Tests for iCalendar export of derived events.
use diynews::calendar::{DeriveOptions, derive_events};
use diynews::export::events_to_ics;
use diynews::model::{Platform, Post};
use std::collections::HashSet;

fn unfold(ics: &str) -> String {
    ics.replace("\r\n ", "").replace("\r\n", "\n")
}

#[test]
fn exports_one_all_day_event_per_derived_event() {
    let mut posts = vec![
        Post::new("p1", Platform::Youtube, "Channel", "Live 6/1", "replay 6/2"),
        Post::new("p2", Platform::Blog, "Zine", "No dates", ""),
    ];
    posts[1].has_schedule = Some(true);
    posts[1].schedule_date = Some("2025-07-04".to_string());

    let events = derive_events(&posts, &HashSet::new(), &DeriveOptions::for_year(2025));
    let ics = unfold(&events_to_ics(&events));

    assert!(ics.starts_with("BEGIN:VCALENDAR"));
    assert!(ics.trim_end().ends_with("END:VCALENDAR"));
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 3);
    assert!(ics.contains("DTSTART;VALUE=DATE:20250601"));
    assert!(ics.contains("DTSTART;VALUE=DATE:20250602"));
    assert!(ics.contains("DTSTART;VALUE=DATE:20250704"));
    assert!(ics.contains("SUMMARY:Live 6/1"));
    assert!(ics.contains("DESCRIPTION:Zine"));
    assert!(ics.contains("UID:p2-20250704-0@diynews"));
}

#[test]
fn empty_export_is_a_valid_calendar() {
    let ics = events_to_ics(&[]);
    assert!(ics.contains("BEGIN:VCALENDAR"));
    assert!(!ics.contains("BEGIN:VEVENT"));
}
