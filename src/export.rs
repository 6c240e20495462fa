// File: ./src/export.rs
//! iCalendar export of derived events.
use crate::model::ScheduledEvent;
use icalendar::{Calendar, Component, Event, EventLike};

/// One all-day VEVENT per event, in input order, inside a single VCALENDAR.
///
/// UIDs are stable across exports of the same posts: they combine the post
/// id, the date and the event's position among that post's events.
pub fn events_to_ics(events: &[ScheduledEvent]) -> String {
    let mut calendar = Calendar::new();
    let mut last_post: Option<&str> = None;
    let mut ordinal = 0usize;

    for ev in events {
        if last_post == Some(ev.post_id.as_str()) {
            ordinal += 1;
        } else {
            ordinal = 0;
            last_post = Some(ev.post_id.as_str());
        }

        let uid = format!(
            "{}-{}-{}@diynews",
            ev.post_id,
            ev.date().format("%Y%m%d"),
            ordinal
        );
        let event = Event::new()
            .uid(&uid)
            .summary(&ev.title)
            .description(&ev.source)
            .all_day(ev.date())
            .done();
        calendar.push(event);
    }

    log::debug!("Exported {} events to iCalendar", events.len());
    calendar.to_string()
}
