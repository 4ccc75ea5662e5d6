use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{
    ImageStore, PostFilter, PostStore, SettingsStore, StoreError, sort_newest_first,
    timestamp_now,
};
use crate::post::PostRecord;

const POSTS_DIR: &str = "posts";
const IMAGES_DIR: &str = "images";
const SETTINGS_FILE: &str = "settings.json";

/// Backend stored as plain files under one directory:
///
/// ```text
/// <root>/posts/<id>.json
/// <root>/settings.json
/// <root>/images/<object>
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    base_url: String,
}

impl FileStore {
    /// Open (or lazily create) a store rooted at `root`. Uploaded images
    /// resolve to `<base_url>/images/<name>`.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn post_path(&self, id: &str) -> PathBuf {
        self.root.join(POSTS_DIR).join(format!("{id}.json"))
    }

    fn read_post(path: &Path) -> Result<PostRecord, StoreError> {
        let text = fs::read_to_string(path).map_err(|source| io_err(path, source))?;
        Ok(serde_json::from_str(&text)?)
    }

    fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| io_err(parent, source))?;
        }
        let text = serde_json::to_string_pretty(value)?;
        fs::write(path, text).map_err(|source| io_err(path, source))
    }

    fn all_posts(&self) -> Result<Vec<PostRecord>, StoreError> {
        let dir = self.root.join(POSTS_DIR);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&dir).map_err(|source| io_err(&dir, source))?;
        let mut posts = Vec::new();
        for entry in entries {
            let path = entry.map_err(|source| io_err(&dir, source))?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                posts.push(Self::read_post(&path)?);
            }
        }
        Ok(posts)
    }

    fn next_id(&self) -> Result<u64, StoreError> {
        Ok(self
            .all_posts()?
            .iter()
            .filter_map(|p| p.id.as_deref()?.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1)
    }

    fn ensure_slug_free(&self, slug: &str, except_id: Option<&str>) -> Result<(), StoreError> {
        let taken = self
            .all_posts()?
            .iter()
            .any(|p| p.slug == slug && p.id.as_deref() != except_id);
        if taken {
            return Err(StoreError::DuplicateSlug(slug.to_string()));
        }
        Ok(())
    }

    fn read_settings(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let path = self.root.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = fs::read_to_string(&path).map_err(|source| io_err(&path, source))?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn io_err(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl PostStore for FileStore {
    fn get(&self, id: &str) -> Result<Option<PostRecord>, StoreError> {
        let path = self.post_path(id);
        if !path.exists() {
            return Ok(None);
        }
        Self::read_post(&path).map(Some)
    }

    fn get_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, StoreError> {
        Ok(self.all_posts()?.into_iter().find(|p| p.slug == slug))
    }

    fn insert(&self, mut record: PostRecord) -> Result<String, StoreError> {
        self.ensure_slug_free(&record.slug, None)?;
        let id = self.next_id()?.to_string();
        let now = timestamp_now();
        record.id = Some(id.clone());
        record.created_at = Some(now.clone());
        record.updated_at = Some(now);
        Self::write_json(&self.post_path(&id), &record)?;
        tracing::debug!(%id, slug = %record.slug, "inserted post");
        Ok(id)
    }

    fn update(&self, id: &str, mut record: PostRecord) -> Result<(), StoreError> {
        let existing = self
            .get(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.ensure_slug_free(&record.slug, Some(id))?;
        record.id = Some(id.to_string());
        record.created_at = existing.created_at;
        record.updated_at = Some(timestamp_now());
        Self::write_json(&self.post_path(id), &record)?;
        tracing::debug!(%id, slug = %record.slug, "updated post");
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let path = self.post_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        fs::remove_file(&path).map_err(|source| io_err(&path, source))
    }

    fn list(&self, filter: &PostFilter) -> Result<Vec<PostRecord>, StoreError> {
        let mut posts: Vec<_> = self
            .all_posts()?
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect();
        sort_newest_first(&mut posts);
        Ok(posts)
    }
}

impl SettingsStore for FileStore {
    fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_settings()?.remove(key))
    }

    fn upsert_setting(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut settings = self.read_settings()?;
        settings.insert(key.to_string(), value.to_string());
        Self::write_json(&self.root.join(SETTINGS_FILE), &settings)
    }
}

impl ImageStore for FileStore {
    fn upload(&self, object_name: &str, bytes: &[u8]) -> Result<String, StoreError> {
        let dir = self.root.join(IMAGES_DIR);
        fs::create_dir_all(&dir).map_err(|source| io_err(&dir, source))?;
        let path = dir.join(object_name);
        fs::write(&path, bytes).map_err(|source| io_err(&path, source))?;
        tracing::debug!(object = object_name, size = bytes.len(), "stored image");
        Ok(format!("{}/{IMAGES_DIR}/{object_name}", self.base_url))
    }
}
