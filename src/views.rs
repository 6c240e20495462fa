// File: ./src/views.rs
//! Plain-text renderings of the dashboard views for the terminal.
//!
//! Every function returns a `String`; printing is left to the binary. With
//! `color` off the output contains no escape sequences.
use crate::calendar::{DayCell, MonthGrid};
use crate::color_utils;
use crate::display::{event_time_label, relative_time, truncate_to_width};
use crate::feed::{self, Highlight};
use crate::model::{Post, ScheduledEvent, Subscription};
use crate::state::AppState;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_i18n::t;
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

const TEXT_WIDTH: usize = 72;
const CELL_WIDTH: usize = 6;

/// Everything a view needs besides the state itself.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub locale: String,
    pub now: DateTime<Utc>,
    pub color: bool,
    pub highlight_count: usize,
}

fn heading(title: &str) -> String {
    format!("== {} ==\n", title)
}

fn platform_badge(post: &Post, color: bool) -> String {
    let name = post.platform.to_string();
    if color {
        color_utils::badge(post.platform.badge_hex(), &name)
    } else {
        format!("[{}]", name)
    }
}

fn day_title(date: NaiveDate, locale: &str) -> String {
    let month = date.month();
    let day = date.day();
    t!("day_title", locale = locale, month = month, day = day).to_string()
}

fn pad_to(out: &mut String, visible: usize, width: usize) {
    for _ in visible..width {
        out.push(' ');
    }
}

fn write_post(out: &mut String, state: &AppState, post: &Post, opts: &RenderOptions) {
    let age = relative_time(&post.created_at, opts.now, &opts.locale);
    let star = if state.is_bookmarked(&post.id) { " ★" } else { "" };
    let _ = writeln!(
        out,
        "{} {} · {} · {}{}",
        platform_badge(post, opts.color),
        post.author,
        age,
        post.id,
        star
    );
    let _ = writeln!(out, "  {}", truncate_to_width(&post.title, TEXT_WIDTH));
    if !post.content.is_empty() {
        let _ = writeln!(out, "  {}", truncate_to_width(&post.content, TEXT_WIDTH));
    }
    if let Some(date) = feed::card_schedule(post, state.derive.year, state.derive.overflow) {
        let label = t!("schedule", locale = &opts.locale);
        let _ = writeln!(out, "  {}: {}", label, day_title(date, &opts.locale));
    }
}

/// Highlights followed by the category-filtered feed.
pub fn render_feed(state: &AppState, opts: &RenderOptions) -> String {
    let posts = state.visible_posts();
    let mut out = String::new();

    let top = feed::highlights(&posts, opts.highlight_count);
    if !top.is_empty() {
        out.push_str(&heading(&t!("highlights_title", locale = &opts.locale)));
        for Highlight {
            post,
            important,
            summary,
        } in &top
        {
            let tag = if *important {
                format!("[{}] ", t!("important", locale = &opts.locale))
            } else {
                String::new()
            };
            let _ = writeln!(
                out,
                "{}{}: {}",
                tag,
                truncate_to_width(&post.title, TEXT_WIDTH),
                summary
            );
        }
        out.push('\n');
    }

    let title = format!("{} ({})", t!("feed_title", locale = &opts.locale), state.category);
    out.push_str(&heading(&title));
    for post in &posts {
        write_post(&mut out, state, post, opts);
    }
    out
}

pub fn render_bookmarks(state: &AppState, opts: &RenderOptions) -> String {
    let mut out = heading(&t!("bookmarks_title", locale = &opts.locale));
    let marked = state.bookmarked_posts();
    if marked.is_empty() {
        let _ = writeln!(out, "{}", t!("no_bookmarks", locale = &opts.locale));
    }
    for post in marked {
        write_post(&mut out, state, post, opts);
    }
    out
}

fn day_number(cell: &DayCell) -> String {
    if cell.is_selected {
        format!("[{:>2}]", cell.day())
    } else if cell.is_today {
        format!(" {:>2}*", cell.day())
    } else {
        format!(" {:>2} ", cell.day())
    }
}

fn day_dots(cell: &DayCell, color: bool) -> (String, usize) {
    let mut text = String::new();
    let mut visible = 0;
    for c in cell.dots() {
        if color {
            text.push_str(&color_utils::dot(c.hex()));
        } else {
            text.push('•');
        }
        visible += 1;
    }
    if cell.overflow() > 0 {
        let more = format!("+{}", cell.overflow());
        visible += more.len();
        text.push_str(&more);
    }
    (text, visible)
}

/// Sunday-first month grid. Each week is a line of day numbers and a line of dots.
pub fn render_month(grid: &MonthGrid, opts: &RenderOptions) -> String {
    let year = grid.month.year();
    let month = grid.month.month();
    let mut out = heading(&t!(
        "month_title",
        locale = &opts.locale,
        year = year,
        month = month
    ));

    let weekdays = t!("weekdays", locale = &opts.locale);
    for name in weekdays.split_whitespace() {
        out.push(' ');
        out.push_str(name);
        pad_to(&mut out, name.width() + 1, CELL_WIDTH);
    }
    out.push('\n');

    for week in grid.weeks() {
        if week.iter().all(Option::is_none) {
            continue;
        }
        let mut numbers = String::new();
        let mut dots = String::new();
        for cell in week {
            match cell {
                Some(cell) => {
                    let n = day_number(cell);
                    let w = n.width();
                    numbers.push_str(&n);
                    pad_to(&mut numbers, w, CELL_WIDTH);

                    let (d, visible) = day_dots(cell, opts.color);
                    dots.push(' ');
                    dots.push_str(&d);
                    pad_to(&mut dots, visible + 1, CELL_WIDTH);
                }
                None => {
                    pad_to(&mut numbers, 0, CELL_WIDTH);
                    pad_to(&mut dots, 0, CELL_WIDTH);
                }
            }
        }
        let _ = writeln!(out, "{}", numbers.trim_end());
        let _ = writeln!(out, "{}", dots.trim_end());
    }
    out
}

/// The event list shown under the calendar for one day.
pub fn render_day_events(date: NaiveDate, events: &[ScheduledEvent], opts: &RenderOptions) -> String {
    let day = day_title(date, &opts.locale);
    let mut out = heading(&t!("day_events", locale = &opts.locale, day = day));
    if events.is_empty() {
        let _ = writeln!(out, "{}", t!("no_events", locale = &opts.locale));
        return out;
    }
    for ev in events {
        let bullet = if opts.color {
            color_utils::dot(ev.color.hex())
        } else {
            "•".to_string()
        };
        let star = if ev.bookmarked { " ★" } else { "" };
        let _ = writeln!(
            out,
            "{} {}  {} ({}){}",
            bullet,
            event_time_label(ev.when, &opts.locale),
            truncate_to_width(&ev.title, TEXT_WIDTH),
            ev.source,
            star
        );
    }
    out
}

pub fn render_accounts(subs: &[Subscription], locale: &str) -> String {
    let mut out = heading(&t!("accounts_title", locale = locale));
    if subs.is_empty() {
        let _ = writeln!(out, "{}", t!("no_accounts", locale = locale));
    }
    for sub in subs {
        let _ = writeln!(
            out,
            "{}  [{}] {}  {}",
            sub.id, sub.platform, sub.name, sub.account_id
        );
    }
    out
}
