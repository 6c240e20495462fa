// File: ./src/feed.rs
//! Feed-side derivations: the per-user post query, category filter,
//! highlight selection and the card schedule badge.
use crate::dates::{self, DateOverflow};
use crate::display::parse_timestamp;
use crate::model::{Category, Post, PostRecord};
use chrono::NaiveDate;

pub const DEFAULT_FEED_LIMIT: usize = 50;
pub const DEFAULT_HIGHLIGHTS: usize = 3;
const SUMMARY_CHARS: usize = 80;

/// Selects the signed-in user's posts, newest first, at most `limit`.
///
/// Mirrors the dashboard query (`userId == uid`, `createdAt desc`, limit).
/// With no user nothing is returned. Records without an id get a positional one.
pub fn query_posts(records: &[PostRecord], user_id: Option<&str>, limit: usize) -> Vec<Post> {
    let Some(uid) = user_id else {
        return Vec::new();
    };

    let mut mine: Vec<(usize, &PostRecord)> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.user_id.as_deref() == Some(uid))
        .collect();

    // Unparsable timestamps sort last; ties keep document order.
    mine.sort_by(|(ia, a), (ib, b)| {
        let ta = a.created_at.as_deref().and_then(parse_timestamp);
        let tb = b.created_at.as_deref().and_then(parse_timestamp);
        tb.cmp(&ta).then(ia.cmp(ib))
    });

    mine.into_iter()
        .take(limit)
        .map(|(i, r)| {
            let id = r.id.clone().unwrap_or_else(|| format!("post-{}", i));
            Post::from_record(&id, r.clone())
        })
        .collect()
}

pub fn filter_by_category(posts: &[Post], category: Category) -> Vec<Post> {
    posts
        .iter()
        .filter(|p| category.matches(p.platform))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Highlight<'a> {
    pub post: &'a Post,
    pub important: bool,
    pub summary: String,
}

/// The first `count` posts; the very first one is flagged important.
pub fn highlights(posts: &[Post], count: usize) -> Vec<Highlight<'_>> {
    posts
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, post)| Highlight {
            post,
            important: i == 0,
            summary: naive_summarize(&post.content),
        })
        .collect()
}

/// First sentence (split on `.`, `!` or `?`), at most 80 characters, then `...`.
pub fn naive_summarize(text: &str) -> String {
    let first = text.split(['.', '!', '?']).next().unwrap_or_default();
    let clipped: String = first.chars().take(SUMMARY_CHARS).collect();
    format!("{}...", clipped)
}

/// The badge date shown on a feed card: the first date found in the text.
pub fn card_schedule(post: &Post, year: i32, overflow: DateOverflow) -> Option<NaiveDate> {
    dates::extract_dates(&post.scan_text(), year, overflow)
        .into_iter()
        .next()
}
