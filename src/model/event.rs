// File: ./src/model/event.rs
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};

/// Fixed palette cycled over posts by their position in the input list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
    Rose,
    Sky,
    Emerald,
    Amber,
    Purple,
}

impl EventColor {
    pub fn hex(&self) -> &'static str {
        match self {
            EventColor::Rose => "#fb7185",
            EventColor::Sky => "#38bdf8",
            EventColor::Emerald => "#34d399",
            EventColor::Amber => "#fbbf24",
            EventColor::Purple => "#c084fc",
        }
    }

    pub fn palette() -> Vec<EventColor> {
        EventColor::iter().collect()
    }

    /// `palette[index % palette.len()]`, falling back to the default palette when empty.
    pub fn for_index(palette: &[EventColor], index: usize) -> EventColor {
        if palette.is_empty() {
            let default = Self::palette();
            return default[index % default.len()];
        }
        palette[index % palette.len()]
    }
}

impl fmt::Display for EventColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventColor::Rose => write!(f, "rose"),
            EventColor::Sky => write!(f, "sky"),
            EventColor::Emerald => write!(f, "emerald"),
            EventColor::Amber => write!(f, "amber"),
            EventColor::Purple => write!(f, "purple"),
        }
    }
}

/// Which source of a post produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventOrigin {
    /// The post's explicit schedule field.
    Explicit,
    /// A date-like substring found in title or body.
    TextScan,
}

/// A calendar-attachable entry derived from a post. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub when: NaiveDateTime,
    pub title: String,
    pub source: String,
    pub post_id: String,
    pub bookmarked: bool,
    pub color: EventColor,
    pub origin: EventOrigin,
}

impl ScheduledEvent {
    pub fn date(&self) -> NaiveDate {
        self.when.date()
    }

    /// Same (day, month, year) triple as `date`.
    pub fn is_on(&self, date: NaiveDate) -> bool {
        let d = self.when.date();
        d.day() == date.day() && d.month() == date.month() && d.year() == date.year()
    }
}
