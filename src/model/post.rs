// File: ./src/model/post.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::EnumIter;

const AVATAR_BASE: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Youtube,
    Blog,
}

impl Platform {
    /// Badge colour used by feed cards.
    pub fn badge_hex(&self) -> &'static str {
        match self {
            Platform::Twitter => "#3b82f6", // blue-500
            Platform::Youtube => "#ef4444", // red-500
            Platform::Blog => "#22c55e",    // green-500
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Twitter => write!(f, "Twitter"),
            Platform::Youtube => write!(f, "YouTube"),
            Platform::Blog => write!(f, "Blog"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "twitter" | "x" => Ok(Platform::Twitter),
            "youtube" => Ok(Platform::Youtube),
            "blog" | "rss" => Ok(Platform::Blog),
            other => Err(format!("Unknown platform '{}'", other)),
        }
    }
}

/// Feed filter selection. `All` keeps every platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    All,
    Twitter,
    Youtube,
    Blog,
}

impl Category {
    pub fn matches(&self, platform: Platform) -> bool {
        match self {
            Category::All => true,
            Category::Twitter => platform == Platform::Twitter,
            Category::Youtube => platform == Platform::Youtube,
            Category::Blog => platform == Platform::Blog,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::All => write!(f, "{}", rust_i18n::t!("category_all")),
            Category::Twitter => write!(f, "Twitter"),
            Category::Youtube => write!(f, "YouTube"),
            Category::Blog => write!(f, "Blog"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Category::All);
        }
        Ok(match s.parse::<Platform>()? {
            Platform::Twitter => Category::Twitter,
            Platform::Youtube => Category::Youtube,
            Platform::Blog => Category::Blog,
        })
    }
}

/// A post document as written by the sync backend.
///
/// Field names follow the stored document layout (camelCase). Everything the
/// backend may omit is optional or defaulted so partially analysed documents
/// still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub platform: Option<Platform>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub has_schedule: Option<bool>,
    #[serde(default)]
    pub schedule_date: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub platform: Platform,
    pub author: String,
    pub author_avatar: String,
    pub title: String,
    pub content: String,
    /// Raw creation timestamp (RFC 3339 as written by the backend).
    pub created_at: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub has_schedule: Option<bool>,
    #[serde(default)]
    pub schedule_date: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub url: String,
}

impl Post {
    /// Builds the session copy of a stored document.
    ///
    /// Documents without a platform tag are treated as blog posts, which is
    /// what the backend's generic RSS fetcher produces.
    pub fn from_record(id: &str, record: PostRecord) -> Self {
        Self {
            id: id.to_string(),
            platform: record.platform.unwrap_or(Platform::Blog),
            author_avatar: avatar_url(&record.author),
            author: record.author,
            title: record.title,
            content: record.summary,
            created_at: record.created_at.unwrap_or_default(),
            published_at: record.published_at,
            has_schedule: record.has_schedule,
            schedule_date: record.schedule_date,
            image_url: record.thumbnail,
            url: record.url,
        }
    }

    /// Minimal constructor, mostly for tests and manual entries.
    pub fn new(id: &str, platform: Platform, author: &str, title: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            platform,
            author: author.to_string(),
            author_avatar: avatar_url(author),
            title: title.to_string(),
            content: content.to_string(),
            created_at: String::new(),
            published_at: None,
            has_schedule: None,
            schedule_date: None,
            image_url: None,
            url: String::new(),
        }
    }

    /// The explicit schedule string, if the post is flagged and the string is non-empty.
    pub fn explicit_schedule(&self) -> Option<&str> {
        if self.has_schedule != Some(true) {
            return None;
        }
        self.schedule_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Title and body joined the way the text scanner sees them.
    pub fn scan_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }
}

fn avatar_url(author: &str) -> String {
    let mut url = String::from(AVATAR_BASE);
    for b in author.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                url.push(b as char)
            }
            _ => url.push_str(&format!("%{:02X}", b)),
        }
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_conversion_maps_summary_and_thumbnail() {
        let record = PostRecord {
            platform: Some(Platform::Youtube),
            author: "Band Official".to_string(),
            title: "New album".to_string(),
            summary: "Out now".to_string(),
            thumbnail: Some("https://img.example/1.jpg".to_string()),
            url: "https://youtube.com/watch?v=1".to_string(),
            ..Default::default()
        };
        let post = Post::from_record("doc-1", record);

        assert_eq!(post.id, "doc-1");
        assert_eq!(post.content, "Out now");
        assert_eq!(post.image_url.as_deref(), Some("https://img.example/1.jpg"));
        assert_eq!(
            post.author_avatar,
            "https://api.dicebear.com/7.x/avataaars/svg?seed=Band%20Official"
        );
    }

    #[test]
    fn explicit_schedule_requires_flag() {
        let mut post = Post::new("1", Platform::Blog, "a", "t", "c");
        post.schedule_date = Some("2025-03-15".to_string());
        assert_eq!(post.explicit_schedule(), None);

        post.has_schedule = Some(true);
        assert_eq!(post.explicit_schedule(), Some("2025-03-15"));

        post.schedule_date = Some("   ".to_string());
        assert_eq!(post.explicit_schedule(), None);
    }

    #[test]
    fn category_parsing() {
        assert_eq!("all".parse::<Category>().unwrap(), Category::All);
        assert_eq!("YouTube".parse::<Category>().unwrap(), Category::Youtube);
        assert!("mastodon".parse::<Category>().is_err());
        assert!(Category::All.matches(Platform::Blog));
        assert!(!Category::Twitter.matches(Platform::Blog));
    }
}
