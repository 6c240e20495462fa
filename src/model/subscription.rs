// File: ./src/model/subscription.rs
use crate::model::Platform;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static TWITTER_HANDLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:twitter|x)\.com/([^/?]+)").expect("valid twitter regex"));
static YOUTUBE_CHANNEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"youtube\.com/(channel|c|user)/([^/?]+)").expect("valid youtube regex")
});

/// A followed account. The backend crawls `rss_url` for every subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub user_id: String,
    pub platform: Platform,
    pub account_id: String,
    pub name: String,
    pub rss_url: String,
    #[serde(default)]
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Creates a subscription from a display name and an account URL,
    /// detecting the platform and account id from the URL.
    pub fn from_url(user_id: &str, name: &str, url: &str) -> Result<Self, String> {
        let name = name.trim();
        let url = url.trim();
        if name.is_empty() || url.is_empty() {
            return Err("Both an account name and a URL are required".to_string());
        }

        let (platform, account_id) = detect_account(url);

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            platform,
            account_id,
            name: name.to_string(),
            rss_url: url.to_string(),
            last_synced_at: None,
            created_at: Utc::now(),
        })
    }
}

/// Platform and account id for an account URL.
///
/// Unknown hosts are blogs keyed by their full URL.
pub fn detect_account(url: &str) -> (Platform, String) {
    if url.contains("twitter.com") || url.contains("x.com") {
        let id = TWITTER_HANDLE
            .captures(url)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| url.to_string());
        return (Platform::Twitter, id);
    }
    if url.contains("youtube.com") {
        let id = YOUTUBE_CHANNEL
            .captures(url)
            .and_then(|c| c.get(2))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| url.to_string());
        return (Platform::Youtube, id);
    }
    (Platform::Blog, url.to_string())
}
