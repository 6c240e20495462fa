// File: ./src/storage.rs
// Local file storage for the post snapshot and the followed-account registry.
//
// ⚠️ VERSION BUMP REQUIRED:
// Changes to the Post struct serialization require incrementing
// POST_SNAPSHOT_VERSION below so stale snapshots are discarded.
use crate::context::AppContext;
use crate::model::{Post, PostRecord, Subscription};
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

// Version history:
// - v1: camelCase Post with optional schedule fields
const POST_SNAPSHOT_VERSION: u32 = 1;

/// Wrapper struct for the versioned post snapshot
#[derive(Serialize, Deserialize)]
struct PostSnapshot {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    user_id: Option<String>,
    posts: Vec<Post>,
}

pub struct LocalStorage;

impl LocalStorage {
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        let name = lock_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        lock_path.set_file_name(format!("{}.lock", name));
        lock_path
    }

    /// Runs `f` while holding an exclusive advisory lock next to `file_path`.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {:?}", lock_path))?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Loads the post snapshot of `user_id`.
    ///
    /// A snapshot written for another user, with another version, or that
    /// fails to parse is treated as empty; the next import rewrites it.
    pub fn load_posts(ctx: &dyn AppContext, user_id: Option<&str>) -> Result<Vec<Post>> {
        let Some(path) = ctx.get_posts_path() else {
            return Ok(vec![]);
        };
        if !path.exists() {
            return Ok(vec![]);
        }
        Self::with_lock(&path, || {
            let json = fs::read_to_string(&path)?;
            match serde_json::from_str::<PostSnapshot>(&json) {
                Ok(snap) if snap.version == POST_SNAPSHOT_VERSION => {
                    if snap.user_id.as_deref() != user_id {
                        log::info!("Post snapshot belongs to another user, ignoring it");
                        return Ok(vec![]);
                    }
                    Ok(snap.posts)
                }
                Ok(snap) => {
                    log::warn!(
                        "Discarding post snapshot v{} (expected v{})",
                        snap.version,
                        POST_SNAPSHOT_VERSION
                    );
                    Ok(vec![])
                }
                Err(e) => {
                    log::warn!("Unreadable post snapshot {:?}: {}", path, e);
                    Ok(vec![])
                }
            }
        })
    }

    pub fn save_posts(ctx: &dyn AppContext, user_id: Option<&str>, posts: &[Post]) -> Result<()> {
        if let Some(path) = ctx.get_posts_path() {
            Self::with_lock(&path, || {
                let data = PostSnapshot {
                    version: POST_SNAPSHOT_VERSION,
                    user_id: user_id.map(str::to_string),
                    posts: posts.to_vec(),
                };
                let json = serde_json::to_string_pretty(&data)?;
                Self::atomic_write(&path, json)?;
                Ok(())
            })?;
        }
        Ok(())
    }
}

/// Exported post documents: either a JSON array of documents or an object
/// keyed by document id. Keys fill in missing `id` fields.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordExport {
    List(Vec<PostRecord>),
    Keyed(BTreeMap<String, PostRecord>),
}

pub fn parse_record_export(json: &str) -> Result<Vec<PostRecord>> {
    let export: RecordExport =
        serde_json::from_str(json).context("Not a list or map of post documents")?;
    Ok(match export {
        RecordExport::List(records) => records,
        RecordExport::Keyed(map) => map
            .into_iter()
            .map(|(key, mut record)| {
                record.id.get_or_insert(key);
                record
            })
            .collect(),
    })
}

/// Followed accounts, persisted as a JSON array in the data dir.
pub struct SubscriptionRegistry;

impl SubscriptionRegistry {
    fn read(path: &Path) -> Result<Vec<Subscription>> {
        if !path.exists() {
            return Ok(vec![]);
        }
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json).with_context(|| format!("Failed to parse {:?}", path))
    }

    fn write(path: &Path, subs: &[Subscription]) -> Result<()> {
        let json = serde_json::to_string_pretty(subs)?;
        LocalStorage::atomic_write(path, json)
    }

    /// Load, change and save under one lock so concurrent writers do not lose entries.
    fn modify<F, T>(ctx: &dyn AppContext, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Subscription>) -> Result<T>,
    {
        let path = ctx
            .get_subscriptions_path()
            .ok_or_else(|| anyhow::anyhow!("No data directory"))?;
        LocalStorage::with_lock(&path, || {
            let mut subs = Self::read(&path)?;
            let out = f(&mut subs)?;
            Self::write(&path, &subs)?;
            Ok(out)
        })
    }

    pub fn load(ctx: &dyn AppContext) -> Result<Vec<Subscription>> {
        let Some(path) = ctx.get_subscriptions_path() else {
            return Ok(vec![]);
        };
        if !path.exists() {
            return Ok(vec![]);
        }
        LocalStorage::with_lock(&path, || Self::read(&path))
    }

    /// Subscriptions of one user.
    pub fn for_user(ctx: &dyn AppContext, user_id: &str) -> Result<Vec<Subscription>> {
        Ok(Self::load(ctx)?
            .into_iter()
            .filter(|s| s.user_id == user_id)
            .collect())
    }

    /// Appends `sub`. Following the same feed twice for one user is refused.
    pub fn add(ctx: &dyn AppContext, sub: Subscription) -> Result<()> {
        Self::modify(ctx, |subs| {
            if subs
                .iter()
                .any(|s| s.user_id == sub.user_id && s.rss_url == sub.rss_url)
            {
                anyhow::bail!("Already following {}", sub.rss_url);
            }
            subs.push(sub);
            Ok(())
        })
    }

    /// Removes the subscription with `id`, returning it if it existed.
    pub fn remove(ctx: &dyn AppContext, id: &str) -> Result<Option<Subscription>> {
        Self::modify(ctx, |subs| {
            Ok(subs
                .iter()
                .position(|s| s.id == id)
                .map(|idx| subs.remove(idx)))
        })
    }
}
