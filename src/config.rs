// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::calendar::DeriveOptions;
use crate::context::AppContext;
use crate::dates::DateOverflow;
use crate::feed::{DEFAULT_FEED_LIMIT, DEFAULT_HIGHLIGHTS};
use crate::model::EventColor;
use crate::storage::LocalStorage;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;

pub const SUPPORTED_LOCALES: &[&str] = &["en", "ko"];

fn default_sync_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_feed_limit() -> usize {
    DEFAULT_FEED_LIMIT
}

fn default_highlight_count() -> usize {
    DEFAULT_HIGHLIGHTS
}

fn default_palette() -> Vec<EventColor> {
    EventColor::palette()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_sync_url")]
    pub sync_url: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,

    #[serde(default)]
    pub date_overflow: DateOverflow,
    #[serde(default)]
    pub dedupe_events: bool,

    #[serde(default = "default_feed_limit")]
    pub feed_limit: usize,
    #[serde(default = "default_highlight_count")]
    pub highlight_count: usize,
    #[serde(default = "default_palette")]
    pub palette: Vec<EventColor>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sync_url: default_sync_url(),
            user_id: None,
            locale: None,
            date_overflow: DateOverflow::default(),
            dedupe_events: false,
            feed_limit: DEFAULT_FEED_LIMIT,
            highlight_count: DEFAULT_HIGHLIGHTS,
            palette: EventColor::palette(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(cfg) => Ok(cfg),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::debug!("No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Helper to detect whether an anyhow::Error indicates that the config file was missing.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    /// Get the path string using an explicit context.
    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }

    /// The configured locale, else the system one, reduced to a supported
    /// language code. Falls back to `en`.
    pub fn resolved_locale(&self) -> String {
        let raw = self
            .locale
            .clone()
            .or_else(sys_locale::get_locale)
            .unwrap_or_else(|| "en".to_string());
        let lang = raw
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        if SUPPORTED_LOCALES.contains(&lang.as_str()) {
            lang
        } else {
            "en".to_string()
        }
    }

    pub fn derive_options(&self, year: i32) -> DeriveOptions {
        DeriveOptions {
            year,
            overflow: self.date_overflow,
            palette: self.palette.clone(),
            dedupe: self.dedupe_events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("user_id = \"u1\"\ndate_overflow = \"reject\"").unwrap();
        assert_eq!(cfg.user_id.as_deref(), Some("u1"));
        assert_eq!(cfg.date_overflow, DateOverflow::Reject);
        assert_eq!(cfg.sync_url, "http://localhost:5000");
        assert_eq!(cfg.feed_limit, 50);
        assert_eq!(cfg.palette.len(), 5);
    }

    #[test]
    fn locale_is_reduced_to_language() {
        let mut cfg = Config::default();
        cfg.locale = Some("ko-KR".to_string());
        assert_eq!(cfg.resolved_locale(), "ko");
        cfg.locale = Some("fr_FR.UTF-8".to_string());
        assert_eq!(cfg.resolved_locale(), "en");
    }
}
