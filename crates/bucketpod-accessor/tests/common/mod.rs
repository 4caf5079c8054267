#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use bucketpod_accessor::{AccessorConfig, BucketAccessor, DataAccessor};
use bucketpod_codec::TripleCodec;
use bucketpod_mapper::{ExtensionMapper, MapperConfig};
use bucketpod_store::{
    InMemoryObjectStore, ListEntry, ObjectHead, ObjectStore, PutOptions, StoreError, StoreResult,
};
use bucketpod_types::{
    collect_bytes, stream_from_bytes, vocab, MetadataSet, ResourceIdentifier,
};
use bytes::Bytes;
use futures::TryStreamExt;

pub fn id(s: &str) -> ResourceIdentifier {
    ResourceIdentifier::new(s).unwrap()
}

pub fn accessor_over(store: Arc<dyn ObjectStore>) -> BucketAccessor {
    BucketAccessor::new(
        store,
        Arc::new(ExtensionMapper::new(MapperConfig::default()).unwrap()),
        Arc::new(TripleCodec::new()),
        AccessorConfig::default(),
    )
    .unwrap()
}

pub fn memory_accessor() -> (Arc<InMemoryObjectStore>, BucketAccessor) {
    let store = Arc::new(InMemoryObjectStore::new());
    let accessor = accessor_over(store.clone());
    (store, accessor)
}

/// Metadata for `path` carrying only a content type.
pub fn typed(path: &str, content_type: &str) -> MetadataSet {
    let mut metadata = MetadataSet::new(id(path));
    metadata.set_content_type(Some(content_type));
    metadata
}

pub async fn write(accessor: &BucketAccessor, path: &str, data: &'static [u8], metadata: &MetadataSet) {
    accessor
        .write_document(&id(path), stream_from_bytes(data), metadata)
        .await
        .unwrap();
}

pub async fn read(accessor: &BucketAccessor, path: &str) -> Bytes {
    let data = accessor.get_data(&id(path)).await.unwrap();
    collect_bytes(data).await.unwrap()
}

pub async fn children(accessor: &BucketAccessor, path: &str) -> Vec<MetadataSet> {
    accessor
        .get_children(&id(path))
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap()
}

pub fn value<'a>(metadata: &'a MetadataSet, predicate: &str) -> Option<&'a str> {
    metadata.get(predicate).map(|t| t.value())
}

pub fn size(metadata: &MetadataSet) -> Option<u64> {
    value(metadata, vocab::POSIX_SIZE).and_then(|v| v.parse().ok())
}

/// In-memory store whose writes fail for selected keys.
pub struct FailingStore {
    pub inner: InMemoryObjectStore,
    fail_put: Box<dyn Fn(&str) -> bool + Send + Sync>,
}

impl FailingStore {
    pub fn failing_puts(fail_put: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            inner: InMemoryObjectStore::new(),
            fail_put: Box::new(fail_put),
        }
    }
}

#[async_trait]
impl ObjectStore for FailingStore {
    async fn head(&self, key: &str) -> StoreResult<ObjectHead> {
        self.inner.head(key).await
    }

    async fn get(&self, key: &str) -> StoreResult<Bytes> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, data: Bytes, opts: PutOptions) -> StoreResult<()> {
        if (self.fail_put)(key) {
            return Err(StoreError::Backend(format!("injected failure writing {key}")));
        }
        self.inner.put(key, data, opts).await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.inner.delete(key).await
    }

    async fn list(&self, prefix: &str) -> StoreResult<Vec<ListEntry>> {
        self.inner.list(prefix).await
    }
}
