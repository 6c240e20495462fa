// Tests for the post query, category filter and session state.
use chrono::NaiveDate;
use diynews::calendar::DeriveOptions;
use diynews::feed::{filter_by_category, query_posts};
use diynews::model::{Category, Platform, Post, PostRecord};
use diynews::state::{AppState, View};

fn record(id: &str, user: &str, created: Option<&str>, platform: Platform) -> PostRecord {
    PostRecord {
        id: Some(id.to_string()),
        platform: Some(platform),
        author: "someone".to_string(),
        title: format!("title {}", id),
        created_at: created.map(str::to_string),
        user_id: Some(user.to_string()),
        ..Default::default()
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn query_filters_user_and_sorts_newest_first() {
    let records = vec![
        record("old", "alice", Some("2025-01-01T00:00:00Z"), Platform::Blog),
        record("bob", "bob", Some("2025-06-01T00:00:00Z"), Platform::Blog),
        record("new", "alice", Some("2025-03-01T00:00:00+09:00"), Platform::Twitter),
        record("undated", "alice", None, Platform::Youtube),
        record("mid", "alice", Some("2025-02-01T12:00:00"), Platform::Blog),
    ];

    let posts = query_posts(&records, Some("alice"), 50);
    let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "mid", "old", "undated"]);

    let limited = query_posts(&records, Some("alice"), 2);
    assert_eq!(limited.len(), 2);
    assert!(query_posts(&records, None, 50).is_empty());
    assert!(query_posts(&records, Some("carol"), 50).is_empty());
}

#[test]
fn query_fills_missing_fields() {
    let mut r = record("x", "alice", None, Platform::Blog);
    r.id = None;
    r.platform = None;
    r.summary = "body".to_string();
    r.thumbnail = Some("https://img".to_string());

    let posts = query_posts(&[r], Some("alice"), 50);
    assert_eq!(posts[0].id, "post-0");
    assert_eq!(posts[0].platform, Platform::Blog);
    assert_eq!(posts[0].content, "body");
    assert_eq!(posts[0].image_url.as_deref(), Some("https://img"));
    assert!(posts[0].author_avatar.ends_with("seed=someone"));
}

#[test]
fn record_reads_document_layout() {
    let json = r#"{
        "platform": "youtube",
        "author": "Channel",
        "title": "Live 6/1",
        "summary": "Stream",
        "createdAt": "2025-05-20T10:00:00Z",
        "hasSchedule": true,
        "scheduleDate": "2025-06-01",
        "userId": "alice",
        "url": "https://youtube.com/watch?v=1"
    }"#;
    let r: PostRecord = serde_json::from_str(json).unwrap();
    let post = Post::from_record("doc1", r);
    assert_eq!(post.platform, Platform::Youtube);
    assert_eq!(post.explicit_schedule(), Some("2025-06-01"));
}

#[test]
fn category_filter() {
    let posts = vec![
        Post::new("1", Platform::Twitter, "a", "t", ""),
        Post::new("2", Platform::Blog, "a", "t", ""),
        Post::new("3", Platform::Twitter, "a", "t", ""),
    ];
    assert_eq!(filter_by_category(&posts, Category::All).len(), 3);
    let tw = filter_by_category(&posts, Category::Twitter);
    assert_eq!(tw.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["1", "3"]);
    assert!(filter_by_category(&posts, Category::Youtube).is_empty());
    assert_eq!("x".parse::<Category>(), Ok(Category::Twitter));
    assert!("myspace".parse::<Category>().is_err());
}

fn loaded_state() -> AppState {
    let mut s = AppState::new(ymd(2025, 3, 10), DeriveOptions::for_year(2025));
    s.sign_in("alice", Some("Alice".to_string()));
    s.set_posts(vec![
        Post::new("1", Platform::Twitter, "a", "Show 3/15", ""),
        Post::new("2", Platform::Blog, "b", "Review", "Out 3/20"),
        Post::new("3", Platform::Youtube, "c", "Vlog", ""),
    ]);
    s
}

#[test]
fn bookmark_toggle_is_an_involution() {
    let mut s = loaded_state();
    assert!(s.toggle_bookmark("2"));
    assert!(s.is_bookmarked("2"));
    assert!(!s.toggle_bookmark("2"));
    assert!(!s.is_bookmarked("2"));

    s.toggle_bookmark("3");
    s.toggle_bookmark("1");
    let ids: Vec<&str> = s.bookmarked_posts().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
}

#[test]
fn bookmarks_flow_into_events() {
    let mut s = loaded_state();
    s.toggle_bookmark("1");
    let events = s.scheduled_events();
    assert_eq!(events.len(), 2);
    assert!(events[0].bookmarked);
    assert!(!events[1].bookmarked);
}

#[test]
fn sign_out_clears_session() {
    let mut s = loaded_state();
    s.toggle_bookmark("1");
    s.sign_out();
    assert!(s.user_id().is_none());
    assert!(s.posts.is_empty());
    assert!(s.bookmarked_posts().is_empty());
    assert!(s.scheduled_events().is_empty());
}

#[test]
fn selection_and_navigation() {
    let mut s = loaded_state();
    assert_eq!(s.selected_date, Some(ymd(2025, 3, 10)));
    assert!(s.selected_events().is_empty());

    s.select_day(15);
    let selected = s.selected_events();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].post_id, "1");

    s.next_month();
    assert_eq!(s.visible_month, ymd(2025, 4, 1));
    s.previous_month();
    s.previous_month();
    assert_eq!(s.visible_month, ymd(2025, 2, 1));
    // Selection survives navigation.
    assert_eq!(s.selected_date, Some(ymd(2025, 3, 15)));

    s.select_date(ymd(2025, 3, 20));
    assert_eq!(s.visible_month, ymd(2025, 3, 1));
    let grid = s.month_grid();
    assert!(grid.day(20).unwrap().is_selected);
    assert_eq!(grid.day(20).unwrap().events.len(), 1);
}

#[test]
fn view_category_and_sync_flags() {
    let mut s = loaded_state();
    assert_eq!(s.view, View::Feed);
    s.set_view(View::Calendar);
    assert_eq!(s.view, View::Calendar);
    s.set_view(View::Accounts);
    assert_eq!(s.view, View::Accounts);

    s.set_category(Category::Blog);
    let visible = s.visible_posts();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, "2");

    assert!(s.begin_sync());
    assert!(!s.begin_sync());
    s.finish_sync();
    assert!(s.begin_sync());
}
