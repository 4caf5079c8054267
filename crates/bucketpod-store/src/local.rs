//! Local-directory backend.
//!
//! Every key becomes one file named by the hex encoding of the key. Keys
//! therefore cannot escape the root, and keys that end in `/` (container
//! placeholders) are ordinary files.
//!
//! Hex doubles a key's length, so encodings longer than [`SHARD_LEN`] are
//! split: each full leading chunk becomes a directory named `<chunk>_` and
//! the remainder is the file name. Short keys stay directly under the root.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::object::{ListEntry, ObjectHead, PutOptions};
use crate::traits::{validate_key, ObjectStore};

const TEMP_PREFIX: &str = ".tmp-";

/// Longest file or directory name component, in hex digits.
pub const SHARD_LEN: usize = 200;

/// Marks a directory as a chunk of an encoded key. Never a hex digit.
const SHARD_MARK: char = '_';

/// Object store backed by a local directory.
#[derive(Debug)]
pub struct LocalObjectStore {
    root: PathBuf,
    temp_counter: AtomicU64,
}

impl LocalObjectStore {
    /// Open (and create if needed) the store directory.
    pub async fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            temp_counter: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let encoded = hex::encode(key);
        let mut path = self.root.clone();
        let mut rest = encoded.as_str();
        while rest.len() > SHARD_LEN {
            let (chunk, tail) = rest.split_at(SHARD_LEN);
            path.push(format!("{chunk}{SHARD_MARK}"));
            rest = tail;
        }
        path.push(rest);
        path
    }

    /// Whether keys under a shard directory can start with `prefix`.
    fn shard_may_match(encoded: &str, prefix: &[u8]) -> bool {
        match hex::decode(encoded) {
            Ok(bytes) => bytes.starts_with(prefix) || prefix.starts_with(&bytes),
            Err(_) => false,
        }
    }

    async fn ensure_parent(&self, path: &Path) -> StoreResult<()> {
        match path.parent() {
            Some(parent) if parent != self.root => {
                fs::create_dir_all(parent).await?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn key_for(file_name: &str) -> Option<String> {
        let raw = hex::decode(file_name).ok()?;
        String::from_utf8(raw).ok()
    }

    fn not_found(key: &str) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
        move |e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::NotFound(key.to_string())
            } else {
                StoreError::Io(e)
            }
        }
    }

    async fn write_atomic(&self, path: &Path, data: &[u8]) -> StoreResult<()> {
        let n = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        let temp = self
            .root
            .join(format!("{TEMP_PREFIX}{}-{n}", std::process::id()));
        let mut f = fs::File::create(&temp).await?;
        f.write_all(data).await?;
        f.flush().await?;
        drop(f);
        if let Err(e) = fs::rename(&temp, path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn write_new(&self, key: &str, path: &Path, data: &[u8]) -> StoreResult<()> {
        let mut f = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::AlreadyExists {
                    StoreError::AlreadyExists(key.to_string())
                } else {
                    StoreError::Io(e)
                }
            })?;
        f.write_all(data).await?;
        f.flush().await?;
        Ok(())
    }
}

fn modified_at(meta: &std::fs::Metadata) -> DateTime<Utc> {
    meta.modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn head(&self, key: &str) -> StoreResult<ObjectHead> {
        let meta = fs::metadata(self.path_for(key))
            .await
            .map_err(Self::not_found(key))?;
        if !meta.is_file() {
            return Err(StoreError::NotFound(key.to_string()));
        }
        Ok(ObjectHead {
            key: key.to_string(),
            content_type: mime_guess::from_path(key).first_raw().map(str::to_string),
            size: meta.len(),
            modified_at: modified_at(&meta),
        })
    }

    async fn get(&self, key: &str) -> StoreResult<Bytes> {
        let data = fs::read(self.path_for(key))
            .await
            .map_err(Self::not_found(key))?;
        Ok(Bytes::from(data))
    }

    async fn put(&self, key: &str, data: Bytes, opts: PutOptions) -> StoreResult<()> {
        validate_key(key)?;
        let path = self.path_for(key);
        self.ensure_parent(&path).await?;
        debug!(key, size = data.len(), overwrite = opts.overwrite, "local put");
        if opts.overwrite {
            self.write_atomic(&path, &data).await
        } else {
            self.write_new(key, &path, &data).await
        }
    }

    /// Shard directories stay in place once created; listing skips them.
    async fn delete(&self, key: &str) -> StoreResult<()> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, prefix: &str) -> StoreResult<Vec<ListEntry>> {
        let mut entries = Vec::new();
        let mut pending = vec![(self.root.clone(), String::new())];
        while let Some((dir_path, encoded_prefix)) = pending.pop() {
            let mut dir = fs::read_dir(&dir_path).await?;
            while let Some(item) = dir.next_entry().await? {
                let name = item.file_name();
                let Some(name) = name.to_str() else {
                    continue;
                };
                if let Some(chunk) = name.strip_suffix(SHARD_MARK) {
                    let encoded = format!("{encoded_prefix}{chunk}");
                    if Self::shard_may_match(&encoded, prefix.as_bytes()) {
                        pending.push((item.path(), encoded));
                    }
                    continue;
                }
                let Some(key) = Self::key_for(&format!("{encoded_prefix}{name}")) else {
                    continue;
                };
                if !key.starts_with(prefix) {
                    continue;
                }
                // A concurrent delete may remove the file between readdir and stat.
                let meta = match item.metadata().await {
                    Ok(meta) => meta,
                    Err(e) if e.kind() == ErrorKind::NotFound => continue,
                    Err(e) => return Err(e.into()),
                };
                if !meta.is_file() {
                    continue;
                }
                entries.push(ListEntry {
                    key,
                    size: meta.len(),
                    modified_at: modified_at(&meta),
                });
            }
        }
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, LocalObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::open(dir.path().join("objects")).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn put_get_head() {
        let (_dir, store) = store().await;
        store
            .put("/docs/a.txt", Bytes::from_static(b"hello"), PutOptions::default())
            .await
            .unwrap();
        assert_eq!(store.get("/docs/a.txt").await.unwrap(), Bytes::from_static(b"hello"));
        let head = store.head("/docs/a.txt").await.unwrap();
        assert_eq!(head.size, 5);
        assert_eq!(head.content_type.as_deref(), Some("text/plain"));
    }

    #[tokio::test]
    async fn keys_with_trailing_separator_are_storable() {
        let (_dir, store) = store().await;
        store
            .put("/docs/", Bytes::new(), PutOptions::create_only())
            .await
            .unwrap();
        assert!(store.exists("/docs/").await.unwrap());
        let err = store
            .put("/docs/", Bytes::new(), PutOptions::create_only())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn traversal_keys_stay_inside_root() {
        let (dir, store) = store().await;
        store
            .put("../../escape", Bytes::from_static(b"x"), PutOptions::default())
            .await
            .unwrap();
        assert!(!dir.path().join("escape").exists());
        assert_eq!(store.list("../").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let (_dir, store) = store().await;
        assert!(store.head("/x").await.unwrap_err().is_not_found());
        assert!(store.get("/x").await.unwrap_err().is_not_found());
        store.delete("/x").await.unwrap();
    }

    #[tokio::test]
    async fn list_filters_and_sorts() {
        let (_dir, store) = store().await;
        for key in ["/docs/sub/b", "/docs/a", "/other"] {
            store
                .put(key, Bytes::from_static(b"z"), PutOptions::default())
                .await
                .unwrap();
        }
        let keys: Vec<_> = store
            .list("/docs/")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(keys, vec!["/docs/a", "/docs/sub/b"]);
    }

    #[tokio::test]
    async fn overwrite_leaves_no_temp_files() {
        let (_dir, store) = store().await;
        for body in [&b"one"[..], &b"two"[..]] {
            store
                .put("/a", Bytes::copy_from_slice(body), PutOptions::default())
                .await
                .unwrap();
        }
        assert_eq!(store.get("/a").await.unwrap(), Bytes::from_static(b"two"));
        let mut names = Vec::new();
        let mut dir = fs::read_dir(store.root()).await.unwrap();
        while let Some(item) = dir.next_entry().await.unwrap() {
            names.push(item.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec![hex::encode("/a")]);
    }

    #[tokio::test]
    async fn long_keys_are_sharded() {
        let (_dir, store) = store().await;
        let long = format!("/docs/{}", "a".repeat(294));
        store
            .put(&long, Bytes::from_static(b"deep"), PutOptions::default())
            .await
            .unwrap();
        store
            .put("/docs/short", Bytes::from_static(b"s"), PutOptions::default())
            .await
            .unwrap();

        let path = store.path_for(&long);
        assert!(path
            .iter()
            .all(|component| component.len() <= SHARD_LEN + 1));
        assert_eq!(store.get(&long).await.unwrap(), Bytes::from_static(b"deep"));
        assert_eq!(store.head(&long).await.unwrap().size, 4);

        let keys: Vec<_> = store
            .list("/docs/")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(keys, vec![long.clone(), "/docs/short".to_string()]);
        assert!(store.list("/other").await.unwrap().is_empty());

        store.delete(&long).await.unwrap();
        assert!(store.head(&long).await.unwrap_err().is_not_found());
        assert_eq!(store.list("/docs/").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_only_applies_to_sharded_keys() {
        let (_dir, store) = store().await;
        let long = format!("/{}/", "b".repeat(150));
        store
            .put(&long, Bytes::new(), PutOptions::create_only())
            .await
            .unwrap();
        let err = store
            .put(&long, Bytes::new(), PutOptions::create_only())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
    }
}
