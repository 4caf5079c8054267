use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::{StoreError, StoreResult};
use crate::object::{ListEntry, ObjectHead, PutOptions, Visibility};
use crate::traits::{validate_key, ObjectStore};

#[derive(Clone, Debug)]
struct Entry {
    data: Bytes,
    content_type: Option<String>,
    visibility: Visibility,
    modified_at: DateTime<Utc>,
}

/// In-memory, `BTreeMap`-based object store.
///
/// Intended for tests and embedding. Keys are kept sorted so prefix listings
/// are a range scan. Listing is immediately consistent, which is stronger
/// than the trait requires.
pub struct InMemoryObjectStore {
    objects: RwLock<BTreeMap<String, Entry>>,
    default_visibility: Visibility,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::with_default_visibility(Visibility::default())
    }

    pub fn with_default_visibility(default_visibility: Visibility) -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
            default_visibility,
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .read()
            .expect("lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Visibility recorded for `key`, if it exists.
    pub fn visibility(&self, key: &str) -> Option<Visibility> {
        self.objects
            .read()
            .expect("lock poisoned")
            .get(key)
            .map(|e| e.visibility)
    }

    /// Remove all objects from the store.
    pub fn clear(&self) {
        self.objects.write().expect("lock poisoned").clear();
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn head(&self, key: &str) -> StoreResult<ObjectHead> {
        let map = self.objects.read().expect("lock poisoned");
        let entry = map
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        Ok(ObjectHead {
            key: key.to_string(),
            content_type: entry.content_type.clone(),
            size: entry.data.len() as u64,
            modified_at: entry.modified_at,
        })
    }

    async fn get(&self, key: &str) -> StoreResult<Bytes> {
        let map = self.objects.read().expect("lock poisoned");
        map.get(key)
            .map(|e| e.data.clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn put(&self, key: &str, data: Bytes, opts: PutOptions) -> StoreResult<()> {
        validate_key(key)?;
        let mut map = self.objects.write().expect("lock poisoned");
        if !opts.overwrite && map.contains_key(key) {
            return Err(StoreError::AlreadyExists(key.to_string()));
        }
        map.insert(
            key.to_string(),
            Entry {
                data,
                content_type: opts.content_type,
                visibility: opts.visibility.unwrap_or(self.default_visibility),
                modified_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.objects.write().expect("lock poisoned").remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> StoreResult<Vec<ListEntry>> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, e)| ListEntry {
                key: k.clone(),
                size: e.data.len() as u64,
                modified_at: e.modified_at,
            })
            .collect())
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &count)
            .finish()
    }
}
