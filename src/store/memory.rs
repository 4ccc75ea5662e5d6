use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use super::{
    ImageStore, PostFilter, PostStore, SettingsStore, StoreError, sort_newest_first,
    timestamp_now,
};
use crate::post::PostRecord;

/// In-process backend holding everything in maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: RefCell<BTreeMap<String, PostRecord>>,
    settings: RefCell<BTreeMap<String, String>>,
    objects: RefCell<BTreeMap<String, Vec<u8>>>,
    next_id: Cell<u64>,
    base_url: String,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_base_url("memory://images")
    }

    /// Uploaded objects resolve to `<base_url>/<name>`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Bytes of an uploaded object.
    pub fn object(&self, name: &str) -> Option<Vec<u8>> {
        self.objects.borrow().get(name).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.borrow().len()
    }

    fn slug_taken(&self, slug: &str, except_id: Option<&str>) -> bool {
        self.posts
            .borrow()
            .iter()
            .any(|(id, post)| post.slug == slug && Some(id.as_str()) != except_id)
    }
}

impl PostStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Option<PostRecord>, StoreError> {
        Ok(self.posts.borrow().get(id).cloned())
    }

    fn get_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, StoreError> {
        Ok(self
            .posts
            .borrow()
            .values()
            .find(|p| p.slug == slug)
            .cloned())
    }

    fn insert(&self, mut record: PostRecord) -> Result<String, StoreError> {
        if self.slug_taken(&record.slug, None) {
            return Err(StoreError::DuplicateSlug(record.slug));
        }
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let id = id.to_string();

        let now = timestamp_now();
        record.id = Some(id.clone());
        record.created_at = Some(now.clone());
        record.updated_at = Some(now);
        self.posts.borrow_mut().insert(id.clone(), record);
        Ok(id)
    }

    fn update(&self, id: &str, mut record: PostRecord) -> Result<(), StoreError> {
        let created_at = self
            .posts
            .borrow()
            .get(id)
            .map(|p| p.created_at.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if self.slug_taken(&record.slug, Some(id)) {
            return Err(StoreError::DuplicateSlug(record.slug));
        }
        record.id = Some(id.to_string());
        record.created_at = created_at;
        record.updated_at = Some(timestamp_now());
        self.posts.borrow_mut().insert(id.to_string(), record);
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.posts
            .borrow_mut()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list(&self, filter: &PostFilter) -> Result<Vec<PostRecord>, StoreError> {
        let mut posts: Vec<_> = self
            .posts
            .borrow()
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        sort_newest_first(&mut posts);
        Ok(posts)
    }
}

impl SettingsStore for MemoryStore {
    fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.settings.borrow().get(key).cloned())
    }

    fn upsert_setting(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.settings
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl ImageStore for MemoryStore {
    fn upload(&self, object_name: &str, bytes: &[u8]) -> Result<String, StoreError> {
        self.objects
            .borrow_mut()
            .insert(object_name.to_string(), bytes.to_vec());
        Ok(format!("{}/{object_name}", self.base_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(slug: &str, topic: &str, published: bool) -> PostRecord {
        PostRecord {
            title: slug.to_string(),
            slug: slug.to_string(),
            topic: topic.to_string(),
            published,
            ..PostRecord::default()
        }
    }

    #[test]
    fn test_insert_assigns_id_and_timestamps() {
        let store = MemoryStore::new();
        let id = store.insert(record("first", "baybolt", true)).unwrap();
        let post = store.get(&id).unwrap().unwrap();
        assert_eq!(post.id.as_deref(), Some(id.as_str()));
        let created = post.created_at.expect("created_at is stamped");
        assert!(chrono::DateTime::parse_from_rfc3339(&created).is_ok(), "got {created}");
        assert_eq!(post.updated_at.as_deref(), Some(created.as_str()));
    }

    #[test]
    fn test_duplicate_slug_is_rejected() {
        let store = MemoryStore::new();
        store.insert(record("same", "baybolt", true)).unwrap();
        assert!(matches!(
            store.insert(record("same", "hugloom", true)),
            Err(StoreError::DuplicateSlug(_))
        ));
    }

    #[test]
    fn test_update_keeps_created_at_and_allows_own_slug() {
        let store = MemoryStore::new();
        let id = store.insert(record("post", "baybolt", false)).unwrap();
        let created = store.get(&id).unwrap().unwrap().created_at;
        let mut changed = record("post", "baybolt", true);
        changed.content = "new body".to_string();
        store.update(&id, changed).unwrap();
        let post = store.get(&id).unwrap().unwrap();
        assert!(post.published);
        assert_eq!(post.created_at, created);
    }

    #[test]
    fn test_update_missing_post_fails() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.update("42", record("x", "baybolt", true)),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_filters_and_orders_newest_first() {
        let store = MemoryStore::new();
        store.insert(record("a", "baybolt", true)).unwrap();
        store.insert(record("b", "baybolt", false)).unwrap();
        store.insert(record("c", "baybolt", true)).unwrap();
        store.insert(record("d", "hugloom", true)).unwrap();
        let slugs: Vec<_> = store
            .list(&PostFilter::published_in("baybolt"))
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, ["c", "a"]);
    }

    #[test]
    fn test_settings_upsert_and_defaults() {
        let store = MemoryStore::new();
        store.upsert_setting("hero_home", "https://img/1.png").unwrap();
        store.upsert_setting("hero_home", "https://img/2.png").unwrap();
        let map = store
            .settings(&["hero_home".to_string(), "hero_baybolt".to_string()])
            .unwrap();
        assert_eq!(map["hero_home"], "https://img/2.png");
        assert_eq!(map["hero_baybolt"], "");
    }

    #[test]
    fn test_hero_settings_cover_home_and_every_topic() {
        let store = MemoryStore::new();
        store.upsert_setting("hero_baybolt", "https://img/bay.png").unwrap();
        let topics = crate::topics::TopicRegistry::builtin();
        let heroes = store.hero_settings(&topics).unwrap();
        assert_eq!(heroes.len(), topics.len() + 1);
        assert_eq!(heroes["hero_home"], "");
        assert_eq!(heroes["hero_baybolt"], "https://img/bay.png");
    }

    #[test]
    fn test_upload_returns_public_url() {
        let store = MemoryStore::with_base_url("https://cdn.example.com/blog-images/");
        let url = store.upload("1-abc.png", b"data").unwrap();
        assert_eq!(url, "https://cdn.example.com/blog-images/1-abc.png");
        assert_eq!(store.object("1-abc.png").unwrap(), b"data");
    }
}
