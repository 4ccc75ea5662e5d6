//! Boundaries to the hosted backend: posts, site settings, image storage and
//! the admin session.
//!
//! The editing surface only talks to these traits. Two backends are provided:
//! [`MemoryStore`] for tests and embedding, and [`FileStore`], a directory of
//! JSON files used by the command-line tool.

mod auth;
mod file;
mod memory;
mod upload;

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use crate::post::PostRecord;
use crate::topics::TopicRegistry;

pub use auth::{ADMIN_ENV, AdminUser, EnvAuth, StaticAuth};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use upload::{MAX_UPLOAD_BYTES, UploadError, mime_for_path, object_name, validate_upload};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no post with id {0}")]
    NotFound(String),
    #[error("slug `{0}` is already used by another post")]
    DuplicateSlug(String),
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed record: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Which posts to list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub topic: Option<String>,
    pub published_only: bool,
}

impl PostFilter {
    /// Published posts of one topic, as shown on its landing page.
    pub fn published_in(topic: impl Into<String>) -> Self {
        Self {
            topic: Some(topic.into()),
            published_only: true,
        }
    }

    /// Every published post.
    pub const fn published() -> Self {
        Self {
            topic: None,
            published_only: true,
        }
    }

    pub fn matches(&self, post: &PostRecord) -> bool {
        (!self.published_only || post.published)
            && self.topic.as_deref().is_none_or(|t| post.topic == t)
    }
}

/// Post table.
pub trait PostStore {
    /// Fetch one post by id.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be read.
    fn get(&self, id: &str) -> Result<Option<PostRecord>, StoreError>;

    /// Fetch one post by slug.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be read.
    fn get_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, StoreError>;

    /// Insert a new post and return its id.
    ///
    /// # Errors
    /// Returns [`StoreError::DuplicateSlug`] if the slug is taken.
    fn insert(&self, record: PostRecord) -> Result<String, StoreError>;

    /// Replace the post stored under `id`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] or [`StoreError::DuplicateSlug`].
    fn update(&self, id: &str, record: PostRecord) -> Result<(), StoreError>;

    /// Remove a post.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if there is no such post.
    fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Posts matching `filter`, newest first.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be read.
    fn list(&self, filter: &PostFilter) -> Result<Vec<PostRecord>, StoreError>;
}

/// Key/value site settings (hero images).
pub trait SettingsStore {
    /// # Errors
    /// Returns an error if the backend cannot be read.
    fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or overwrite a setting.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be written.
    fn upsert_setting(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Values for `keys`; missing keys map to an empty string.
    ///
    /// # Errors
    /// Returns the first backend error encountered.
    fn settings(&self, keys: &[String]) -> Result<BTreeMap<String, String>, StoreError> {
        keys.iter()
            .map(|key| Ok((key.clone(), self.get_setting(key)?.unwrap_or_default())))
            .collect()
    }

    /// Hero image URLs keyed `hero_home` and `hero_<topic>`, home first.
    ///
    /// # Errors
    /// Returns the first backend error encountered.
    fn hero_settings(
        &self,
        topics: &TopicRegistry,
    ) -> Result<BTreeMap<String, String>, StoreError> {
        self.settings(&topics.hero_keys())
    }
}

/// Public object storage for uploaded images.
pub trait ImageStore {
    /// Store `bytes` under `object_name` and return its public URL.
    ///
    /// # Errors
    /// Returns an error if the object cannot be written.
    fn upload(&self, object_name: &str, bytes: &[u8]) -> Result<String, StoreError>;
}

/// The admin session the editor runs in.
pub trait AuthGate {
    fn current_user(&self) -> Option<AdminUser>;
}

/// RFC 3339 timestamp (UTC, millisecond precision) as stored in
/// `created_at`/`updated_at`.
pub(crate) fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Newest first: by `created_at`, then by numeric id.
pub(crate) fn sort_newest_first(posts: &mut [PostRecord]) {
    let key = |p: &PostRecord| {
        (
            p.created_at
                .as_deref()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map_or(DateTime::<Utc>::MIN_UTC, |d| d.with_timezone(&Utc)),
            p.id.as_deref().and_then(|s| s.parse::<u64>().ok()).unwrap_or(0),
        )
    };
    posts.sort_by_key(|p| std::cmp::Reverse(key(p)));
}
