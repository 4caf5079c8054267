use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{StoreError, StoreResult};
use crate::object::{ListEntry, ObjectHead, PutOptions};

/// Flat, key-addressed object store.
///
/// Keys are opaque strings; the store has no notion of directories. All
/// implementations must satisfy these invariants:
/// - Each individual `put` and `delete` is atomic for its key.
/// - A missing key is reported as [`StoreError::NotFound`], never as another
///   variant, so callers can normalize it.
/// - `delete` of an absent key succeeds.
/// - Listing may lag behind writes; callers must not rely on a `list` issued
///   right after a `put` seeing the new key.
/// - No retries are performed here or by callers of this trait.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Existence check plus live size/mtime for the exact key.
    async fn head(&self, key: &str) -> StoreResult<ObjectHead>;

    /// Fetch the full contents of the exact key.
    async fn get(&self, key: &str) -> StoreResult<Bytes>;

    /// Store `data` under `key`, replacing any previous object unless
    /// `opts.overwrite` is `false`.
    async fn put(&self, key: &str, data: Bytes, opts: PutOptions) -> StoreResult<()>;

    /// Delete the exact key. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Every key starting with `prefix`, in no guaranteed order.
    async fn list(&self, prefix: &str) -> StoreResult<Vec<ListEntry>>;

    /// Whether the exact key exists.
    async fn exists(&self, key: &str) -> StoreResult<bool> {
        match self.head(key).await {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

pub(crate) fn validate_key(key: &str) -> StoreResult<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason: "key must not be empty".into(),
        });
    }
    Ok(())
}
