// File: src/state.rs
//! Session state of the dashboard.
//!
//! Everything the views read (signed-in user, loaded posts, bookmarks,
//! selection) lives in one `AppState` owned by the caller. Derived data
//! (visible posts, scheduled events, the month grid) is recomputed from it
//! on demand and never cached.
use crate::calendar::{self, DeriveOptions, MonthGrid};
use crate::feed;
use crate::model::{Category, Post, ScheduledEvent};
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Feed,
    Calendar,
    Accounts,
    Bookmarks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub uid: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub user: Option<UserSession>,
    pub posts: Vec<Post>,
    pub bookmarks: HashSet<String>,
    pub view: View,
    pub category: Category,
    pub selected_date: Option<NaiveDate>,
    /// First day of the month shown by the calendar.
    pub visible_month: NaiveDate,
    pub today: NaiveDate,
    pub is_syncing: bool,
    pub derive: DeriveOptions,
}

impl AppState {
    /// Fresh session: nothing loaded, today selected.
    pub fn new(today: NaiveDate, derive: DeriveOptions) -> Self {
        Self {
            user: None,
            posts: Vec::new(),
            bookmarks: HashSet::new(),
            view: View::default(),
            category: Category::default(),
            selected_date: Some(today),
            visible_month: calendar::month_start(today),
            today,
            is_syncing: false,
            derive,
        }
    }

    // --- Session ---

    pub fn sign_in(&mut self, uid: &str, display_name: Option<String>) {
        self.user = Some(UserSession {
            uid: uid.to_string(),
            display_name,
        });
    }

    /// Signing out drops the user's posts; bookmarks are session-only anyway.
    pub fn sign_out(&mut self) {
        self.user = None;
        self.posts.clear();
        self.bookmarks.clear();
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.uid.as_str())
    }

    // --- Posts ---

    pub fn set_posts(&mut self, posts: Vec<Post>) {
        self.posts = posts;
    }

    /// Removes a post and any bookmark on it. Returns the removed post.
    pub fn delete_post(&mut self, id: &str) -> Option<Post> {
        let idx = self.posts.iter().position(|p| p.id == id)?;
        self.bookmarks.remove(id);
        Some(self.posts.remove(idx))
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn visible_posts(&self) -> Vec<Post> {
        feed::filter_by_category(&self.posts, self.category)
    }

    // --- Bookmarks ---

    /// Adds or removes `id`. Returns whether it is bookmarked afterwards.
    pub fn toggle_bookmark(&mut self, id: &str) -> bool {
        if self.bookmarks.remove(id) {
            false
        } else {
            self.bookmarks.insert(id.to_string());
            true
        }
    }

    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.bookmarks.contains(id)
    }

    /// Bookmarked posts in feed order.
    pub fn bookmarked_posts(&self) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|p| self.bookmarks.contains(&p.id))
            .collect()
    }

    // --- Calendar ---

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = Some(date);
        self.visible_month = calendar::month_start(date);
    }

    /// Selects `day` of the visible month. Out-of-range days are ignored.
    pub fn select_day(&mut self, day: u32) -> Option<NaiveDate> {
        let date = self.visible_month.with_day(day)?;
        self.selected_date = Some(date);
        Some(date)
    }

    /// Shows the month containing `date` without changing the selection.
    pub fn show_month(&mut self, date: NaiveDate) {
        self.visible_month = calendar::month_start(date);
    }

    pub fn previous_month(&mut self) {
        self.visible_month = calendar::previous_month(self.visible_month);
    }

    pub fn next_month(&mut self) {
        self.visible_month = calendar::next_month(self.visible_month);
    }

    pub fn scheduled_events(&self) -> Vec<ScheduledEvent> {
        calendar::derive_events(&self.posts, &self.bookmarks, &self.derive)
    }

    pub fn selected_events(&self) -> Vec<ScheduledEvent> {
        match self.selected_date {
            Some(date) => calendar::events_on(&self.scheduled_events(), date),
            None => Vec::new(),
        }
    }

    pub fn month_grid(&self) -> MonthGrid {
        MonthGrid::build(
            self.visible_month,
            &self.scheduled_events(),
            self.today,
            self.selected_date,
        )
    }

    // --- Sync ---

    /// Marks a sync as in flight. Returns false if one already is.
    pub fn begin_sync(&mut self) -> bool {
        if self.is_syncing {
            log::info!("Sync already in progress, ignoring request");
            return false;
        }
        self.is_syncing = true;
        true
    }

    pub fn finish_sync(&mut self) {
        self.is_syncing = false;
    }
}
