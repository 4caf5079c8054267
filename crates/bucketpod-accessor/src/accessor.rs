use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use bucketpod_codec::MetadataCodec;
use bucketpod_mapper::IdentifierMapper;
use bucketpod_store::{ObjectStore, PutOptions, StoreError, StoreResult};
use bucketpod_types::vocab::{self, DEFAULT_CONTENT_TYPE};
use bucketpod_types::{
    collect_bytes, stream_from_bytes, ByteStream, MetadataSet, ObjectKind, Representation,
    ResourceIdentifier, ResourceLink, StorageObjectStat,
};
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::children::{Child, ChildGrouper};
use crate::config::AccessorConfig;
use crate::error::{AccessorError, AccessorResult};
use crate::merge::{add_content_type, add_live_fields, strip_storage_derived};
use crate::traits::{ChildStream, DataAccessor};

/// Storage adapter emulating containers and documents over a flat store.
///
/// Containers have no object of their own: a container exists while at least
/// one key shares its prefix (a placeholder written by `write_container`, its
/// sidecar, or any descendant). Documents are single keys whose extension may
/// encode their content type; descriptive metadata lives in a sidecar key.
///
/// Nothing here is transactional. Writes that touch two keys order them so
/// the failure modes are benign and compensate where they can, but a reader
/// racing a writer can observe the sidecar without the data.
pub struct BucketAccessor {
    store: Arc<dyn ObjectStore>,
    mapper: Arc<dyn IdentifierMapper>,
    codec: Arc<dyn MetadataCodec>,
    config: AccessorConfig,
}

impl BucketAccessor {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        mapper: Arc<dyn IdentifierMapper>,
        codec: Arc<dyn MetadataCodec>,
        config: AccessorConfig,
    ) -> AccessorResult<Self> {
        if !codec.supports(&config.metadata_format) {
            return Err(AccessorError::Config(format!(
                "metadata codec cannot handle {:?}",
                config.metadata_format
            )));
        }
        Ok(Self {
            store,
            mapper,
            codec,
            config,
        })
    }

    pub fn config(&self) -> &AccessorConfig {
        &self.config
    }

    // ---- Key resolution and stat ----

    fn primary_link(
        &self,
        identifier: &ResourceIdentifier,
        content_type: Option<&str>,
    ) -> AccessorResult<ResourceLink> {
        Ok(self.mapper.resolve(identifier, false, content_type)?)
    }

    fn sidecar_link(&self, identifier: &ResourceIdentifier) -> AccessorResult<ResourceLink> {
        Ok(self.mapper.resolve(identifier, true, None)?)
    }

    /// Type the key implies, falling back to the generic binary type.
    fn derived_content_type(&self, key: &str) -> String {
        self.mapper
            .content_type_for_key(key)
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
    }

    /// A container exists while its prefix lists at least one key.
    async fn stat_container(&self, link: &ResourceLink) -> AccessorResult<StorageObjectStat> {
        let entries = self.store.list(&link.storage_key).await?;
        debug!(prefix = %link.storage_key, count = entries.len(), "container stat");
        let mtime = entries
            .iter()
            .map(|e| e.modified_at)
            .max()
            .ok_or_else(|| AccessorError::NotFound(link.identifier.to_string()))?;
        Ok(StorageObjectStat::Directory { mtime })
    }

    /// Find the key a document is stored under and stat it.
    ///
    /// The exact base key wins; otherwise the first extension variant in the
    /// base key's listing is used.
    async fn stat_document(
        &self,
        identifier: &ResourceIdentifier,
    ) -> AccessorResult<(ResourceLink, StorageObjectStat)> {
        let link = self.primary_link(identifier, None)?;
        match self.store.head(&link.storage_key).await {
            Ok(head) => {
                let stat = StorageObjectStat::File {
                    mtime: head.modified_at,
                    size: head.size,
                };
                return Ok((link, stat));
            }
            Err(StoreError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let mut variants: Vec<_> = self
            .store
            .list(&link.storage_key)
            .await?
            .into_iter()
            .filter(|e| self.mapper.is_extension_variant(&link.storage_key, &e.key))
            .collect();
        variants.sort_by(|a, b| a.key.cmp(&b.key));
        let found = variants
            .into_iter()
            .next()
            .ok_or_else(|| AccessorError::NotFound(identifier.to_string()))?;
        debug!(identifier = %identifier, key = %found.key, "document found under extension variant");

        let content_type = self.mapper.content_type_for_key(&found.key);
        let stat = StorageObjectStat::File {
            mtime: found.modified_at,
            size: found.size,
        };
        let link = ResourceLink::new(identifier.clone(), found.key).with_content_type(content_type);
        Ok((link, stat))
    }

    /// Stat `identifier` as the kind its path denotes.
    ///
    /// The returned stat always matches that kind: a document path whose key
    /// only exists as a prefix of deeper keys, or a container prefix with no
    /// keys under it, is `NotFound`.
    async fn stat(
        &self,
        identifier: &ResourceIdentifier,
    ) -> AccessorResult<(ResourceLink, StorageObjectStat)> {
        if identifier.is_container() {
            let link = self.primary_link(identifier, None)?;
            let stat = self.stat_container(&link).await?;
            Ok((link, stat))
        } else {
            self.stat_document(identifier).await
        }
    }

    // ---- Sidecars ----

    async fn read_sidecar(&self, identifier: &ResourceIdentifier) -> AccessorResult<MetadataSet> {
        let link = self.sidecar_link(identifier)?;
        let data = match self.store.get(&link.storage_key).await {
            Ok(data) => data,
            Err(StoreError::NotFound(_)) => return Ok(MetadataSet::new(identifier.clone())),
            Err(e) => return Err(e.into()),
        };
        let triples =
            self.codec
                .decode(&data, &self.config.metadata_format, identifier.as_str())?;
        Ok(MetadataSet::from_triples(identifier.clone(), triples))
    }

    /// Persist the non-derivable part of `metadata`.
    ///
    /// Returns `true` if a sidecar object was written. When nothing is left
    /// after filtering, any previous sidecar is removed instead.
    async fn write_sidecar(
        &self,
        identifier: &ResourceIdentifier,
        metadata: &MetadataSet,
        kind: ObjectKind,
        derived_content_type: Option<&str>,
    ) -> AccessorResult<bool> {
        let link = self.sidecar_link(identifier)?;
        let filtered = strip_storage_derived(metadata, kind, derived_content_type);
        if filtered.is_empty() {
            debug!(key = %link.storage_key, "no metadata to persist; clearing sidecar");
            self.store.delete(&link.storage_key).await?;
            return Ok(false);
        }
        let body = self
            .codec
            .encode(filtered.triples(), &self.config.metadata_format)?;
        let opts = PutOptions::default().with_content_type(self.config.metadata_format.clone());
        self.store.put(&link.storage_key, body, opts).await?;
        debug!(key = %link.storage_key, triples = filtered.len(), "sidecar written");
        Ok(true)
    }

    /// Run the data write; on failure delete the sidecar written before it.
    async fn with_sidecar_rollback(
        &self,
        sidecar_key: Option<&str>,
        data_write: impl Future<Output = StoreResult<()>> + Send,
    ) -> AccessorResult<()> {
        let Err(err) = data_write.await else {
            return Ok(());
        };
        if let Some(key) = sidecar_key {
            match self.store.delete(key).await {
                Ok(()) => debug!(key, "rolled back sidecar after failed data write"),
                Err(e) => warn!(key, error = %e, "failed to roll back sidecar"),
            }
        }
        Err(err.into())
    }

    /// Delete keys left behind by an earlier write under another extension.
    async fn remove_stale_variants(
        &self,
        identifier: &ResourceIdentifier,
        new_key: &str,
    ) -> AccessorResult<()> {
        let base = self.primary_link(identifier, None)?.storage_key;
        let stale: Vec<String> = self
            .store
            .list(&base)
            .await?
            .into_iter()
            .map(|e| e.key)
            .filter(|k| k != new_key && (*k == base || self.mapper.is_extension_variant(&base, k)))
            .collect();
        for key in stale {
            info!(identifier = %identifier, stale = %key, current = new_key, "removing document stored under previous extension");
            self.store.delete(&key).await?;
        }
        Ok(())
    }

    // ---- Child records ----

    /// Identifier segment for `child`; documents drop any appended extension.
    fn child_name<'a>(mapper: &dyn IdentifierMapper, child: &'a Child) -> &'a str {
        match child.kind {
            ObjectKind::File => mapper.document_name(&child.name),
            ObjectKind::Directory => &child.name,
        }
    }

    fn child_record(
        mapper: &dyn IdentifierMapper,
        parent: &ResourceIdentifier,
        child: Child,
    ) -> AccessorResult<MetadataSet> {
        let identifier = parent
            .join(Self::child_name(mapper, &child))
            .map_err(|e| AccessorError::BadRequest(e.to_string()))?;
        let mut metadata = MetadataSet::new(identifier);
        let stat = match child.kind {
            ObjectKind::File => StorageObjectStat::File {
                mtime: child.mtime,
                size: child.size,
            },
            ObjectKind::Directory => StorageObjectStat::Directory { mtime: child.mtime },
        };
        add_live_fields(&mut metadata, &stat);
        if child.kind == ObjectKind::File {
            let content_type = mapper
                .content_type_for_key(&child.key)
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
            if !add_content_type(&mut metadata, &content_type) {
                warn!(key = %child.key, content_type = %content_type, "skipping content type that is not a valid media type");
            }
        }
        Ok(metadata)
    }
}

#[async_trait]
impl DataAccessor for BucketAccessor {
    fn can_handle(&self, representation: &Representation) -> AccessorResult<()> {
        if representation.binary {
            return Ok(());
        }
        Err(AccessorError::UnsupportedMediaType(format!(
            "only binary data can be stored, got {}",
            representation.metadata.content_type().unwrap_or("an object stream")
        )))
    }

    async fn get_data(&self, identifier: &ResourceIdentifier) -> AccessorResult<ByteStream> {
        let (link, stat) = self.stat(identifier).await?;
        if stat.kind() != ObjectKind::File {
            return Err(AccessorError::NotFound(identifier.to_string()));
        }
        let data = self.store.get(&link.storage_key).await?;
        debug!(identifier = %identifier, key = %link.storage_key, size = data.len(), "data read");
        Ok(stream_from_bytes(data))
    }

    async fn get_metadata(&self, identifier: &ResourceIdentifier) -> AccessorResult<MetadataSet> {
        let (link, stat) = self.stat(identifier).await?;
        let mut metadata = self.read_sidecar(identifier).await?;
        match stat {
            StorageObjectStat::File { .. } => {
                if metadata.content_type().is_none() {
                    let derived = self.derived_content_type(&link.storage_key);
                    metadata.set_content_type(Some(&derived));
                }
            }
            StorageObjectStat::Directory { .. } => {
                metadata.remove_all(vocab::CONTENT_TYPE);
            }
        }
        add_live_fields(&mut metadata, &stat);
        Ok(metadata)
    }

    async fn get_children(&self, identifier: &ResourceIdentifier) -> AccessorResult<ChildStream> {
        if !identifier.is_container() {
            return Err(AccessorError::BadRequest(format!(
                "{identifier} is not a container"
            )));
        }
        let link = self.primary_link(identifier, None)?;
        let mut entries = self.store.list(&link.storage_key).await?;
        if entries.is_empty() {
            return Err(AccessorError::NotFound(identifier.to_string()));
        }
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        debug!(identifier = %identifier, keys = entries.len(), "listing children");

        let grouper = ChildGrouper::new(
            link.storage_key,
            self.mapper.metadata_suffix(),
            entries,
        );
        let mapper = Arc::clone(&self.mapper);
        let parent = identifier.clone();
        let mut seen = HashSet::new();
        // A bare key and a variant of it can coexist briefly while a write
        // migrates extensions; the first in key order is the one stat reads.
        let unique: Vec<Child> = grouper
            .filter(|child| seen.insert(Self::child_name(mapper.as_ref(), child).to_string()))
            .collect();
        Ok(stream::iter(unique)
            .map(move |child| Self::child_record(mapper.as_ref(), &parent, child))
            .boxed())
    }

    async fn write_document(
        &self,
        identifier: &ResourceIdentifier,
        data: ByteStream,
        metadata: &MetadataSet,
    ) -> AccessorResult<()> {
        if identifier.is_container() {
            return Err(AccessorError::BadRequest(format!(
                "{identifier} is a container, not a document"
            )));
        }
        let link = self.primary_link(identifier, metadata.content_type())?;
        let body: Bytes = collect_bytes(data).await?;

        self.remove_stale_variants(identifier, &link.storage_key)
            .await?;

        let derived = self.derived_content_type(&link.storage_key);
        let sidecar_written = self
            .write_sidecar(identifier, metadata, ObjectKind::File, Some(&derived))
            .await?;
        let sidecar_key = if sidecar_written {
            Some(self.sidecar_link(identifier)?.storage_key)
        } else {
            None
        };

        let size = body.len();
        let opts = PutOptions {
            content_type: link.content_type.clone(),
            ..Default::default()
        };
        self.with_sidecar_rollback(
            sidecar_key.as_deref(),
            self.store.put(&link.storage_key, body, opts),
        )
        .await?;
        debug!(identifier = %identifier, key = %link.storage_key, size, "document written");
        Ok(())
    }

    async fn write_container(
        &self,
        identifier: &ResourceIdentifier,
        metadata: &MetadataSet,
    ) -> AccessorResult<()> {
        if !identifier.is_container() {
            return Err(AccessorError::BadRequest(format!(
                "{identifier} is a document, not a container"
            )));
        }
        let link = self.primary_link(identifier, None)?;
        if self.store.list(&link.storage_key).await?.is_empty() {
            match self
                .store
                .put(&link.storage_key, Bytes::new(), PutOptions::create_only())
                .await
            {
                Ok(()) => debug!(key = %link.storage_key, "container placeholder created"),
                Err(StoreError::AlreadyExists(_)) => {
                    debug!(key = %link.storage_key, "container placeholder already present")
                }
                Err(e) => return Err(e.into()),
            }
        }
        self.write_sidecar(identifier, metadata, ObjectKind::Directory, None)
            .await?;
        Ok(())
    }

    async fn write_metadata(
        &self,
        identifier: &ResourceIdentifier,
        metadata: &MetadataSet,
    ) -> AccessorResult<()> {
        if identifier.is_container() {
            self.write_sidecar(identifier, metadata, ObjectKind::Directory, None)
                .await?;
            return Ok(());
        }
        let key = match self.stat_document(identifier).await {
            Ok((link, _)) => link.storage_key,
            Err(AccessorError::NotFound(_)) => self.primary_link(identifier, None)?.storage_key,
            Err(e) => return Err(e),
        };
        let derived = self.derived_content_type(&key);
        self.write_sidecar(identifier, metadata, ObjectKind::File, Some(&derived))
            .await?;
        Ok(())
    }

    /// Sidecar first, then the data key. A container whose placeholder is
    /// gone stays listed while descendants remain; emptiness checks belong
    /// to the host server.
    async fn delete_resource(&self, identifier: &ResourceIdentifier) -> AccessorResult<()> {
        let sidecar = self.sidecar_link(identifier)?;
        match self.store.delete(&sidecar.storage_key).await {
            Ok(()) | Err(StoreError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let (link, _stat) = self.stat(identifier).await?;
        self.store.delete(&link.storage_key).await?;
        debug!(identifier = %identifier, key = %link.storage_key, "resource deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketpod_codec::{TripleCodec, JSON};
    use bucketpod_mapper::{ExtensionMapper, MapperConfig};
    use bucketpod_store::InMemoryObjectStore;
    use bucketpod_types::Term;

    fn setup() -> (Arc<InMemoryObjectStore>, BucketAccessor) {
        let store = Arc::new(InMemoryObjectStore::new());
        let mapper = ExtensionMapper::new(MapperConfig::default()).unwrap();
        let accessor = BucketAccessor::new(
            store.clone(),
            Arc::new(mapper),
            Arc::new(TripleCodec::new()),
            AccessorConfig::default(),
        )
        .unwrap();
        (store, accessor)
    }

    fn id(s: &str) -> ResourceIdentifier {
        ResourceIdentifier::new(s).unwrap()
    }

    async fn put(store: &InMemoryObjectStore, key: &str, data: &'static [u8]) {
        store
            .put(key, Bytes::from_static(data), PutOptions::default())
            .await
            .unwrap();
    }

    #[test]
    fn rejects_unsupported_sidecar_format() {
        let result = BucketAccessor::new(
            Arc::new(InMemoryObjectStore::new()),
            Arc::new(ExtensionMapper::new(MapperConfig::default()).unwrap()),
            Arc::new(TripleCodec::new()),
            AccessorConfig {
                metadata_format: "application/rdf+xml".into(),
            },
        );
        assert!(matches!(result, Err(AccessorError::Config(_))));
    }

    #[tokio::test]
    async fn stat_prefers_exact_key() {
        let (store, accessor) = setup();
        put(&store, "/docs/a", b"exact").await;
        put(&store, "/docs/a.txt", b"variant").await;

        let (link, stat) = accessor.stat(&id("/docs/a")).await.unwrap();
        assert_eq!(link.storage_key, "/docs/a");
        assert_eq!(stat.size(), 5);
    }

    #[tokio::test]
    async fn stat_falls_back_to_first_variant() {
        let (store, accessor) = setup();
        put(&store, "/docs/a$.txt", b"text").await;
        put(&store, "/docs/a.meta", b"").await;
        put(&store, "/docs/ab$.html", b"other").await;

        let (link, stat) = accessor.stat(&id("/docs/a")).await.unwrap();
        assert_eq!(link.storage_key, "/docs/a$.txt");
        assert_eq!(link.content_type.as_deref(), Some("text/plain"));
        assert_eq!(stat, StorageObjectStat::File { mtime: stat.mtime(), size: 4 });
    }

    #[tokio::test]
    async fn named_document_is_not_a_variant() {
        let (store, accessor) = setup();
        put(&store, "/docs/a.txt", b"notes").await;
        assert!(accessor.stat(&id("/docs/a")).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn document_path_over_deeper_keys_is_not_found() {
        let (store, accessor) = setup();
        put(&store, "/docs/sub/x", b"x").await;
        let err = accessor.stat(&id("/docs/sub")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn container_stat_takes_latest_mtime() {
        let (store, accessor) = setup();
        put(&store, "/docs/a", b"a").await;
        put(&store, "/docs/b/c", b"c").await;
        let latest = store.head("/docs/b/c").await.unwrap().modified_at;

        let (_, stat) = accessor.stat(&id("/docs/")).await.unwrap();
        assert_eq!(stat, StorageObjectStat::Directory { mtime: latest });
    }

    #[tokio::test]
    async fn empty_metadata_clears_sidecar() {
        let (store, accessor) = setup();
        put(&store, "/docs/a.meta", b"<urn:s> <urn:p> \"old\" .\n").await;

        let written = accessor
            .write_sidecar(&id("/docs/a"), &MetadataSet::new(id("/docs/a")), ObjectKind::File, None)
            .await
            .unwrap();
        assert!(!written);
        assert!(!store.exists("/docs/a.meta").await.unwrap());
    }

    #[tokio::test]
    async fn sidecar_keeps_only_caller_statements() {
        let (store, accessor) = setup();
        let mut metadata = MetadataSet::new(id("/docs/a.txt"));
        metadata.add("urn:example:title", Term::literal("Hello"));
        metadata.add(vocab::POSIX_SIZE, Term::typed("99", vocab::XSD_INTEGER));
        metadata.set_content_type(Some("text/plain"));

        let written = accessor
            .write_sidecar(&id("/docs/a.txt"), &metadata, ObjectKind::File, Some("text/plain"))
            .await
            .unwrap();
        assert!(written);

        let stored = accessor.read_sidecar(&id("/docs/a.txt")).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.get("urn:example:title"), Some(&Term::literal("Hello")));
        assert_eq!(
            store.head("/docs/a.txt.meta").await.unwrap().content_type.as_deref(),
            Some("text/turtle")
        );
    }

    #[tokio::test]
    async fn json_sidecars_round_trip() {
        let store = Arc::new(InMemoryObjectStore::new());
        let accessor = BucketAccessor::new(
            store.clone(),
            Arc::new(ExtensionMapper::new(MapperConfig::default()).unwrap()),
            Arc::new(TripleCodec::new()),
            AccessorConfig {
                metadata_format: JSON.into(),
            },
        )
        .unwrap();
        let mut metadata = MetadataSet::new(id("/docs/"));
        metadata.add("urn:example:owner", Term::named("urn:example:alice"));
        accessor.write_container(&id("/docs/"), &metadata).await.unwrap();

        let raw = store.get("/docs/.meta").await.unwrap();
        assert!(raw.starts_with(b"["));
        let read = accessor.get_metadata(&id("/docs/")).await.unwrap();
        assert!(read.has("urn:example:owner", &Term::named("urn:example:alice")));
    }

    #[tokio::test]
    async fn corrupt_sidecar_surfaces_as_metadata_error() {
        let (store, accessor) = setup();
        put(&store, "/docs/a", b"data").await;
        put(&store, "/docs/a.meta", b"this is not a triple\n").await;

        let err = accessor.get_metadata(&id("/docs/a")).await.unwrap_err();
        assert!(matches!(err, AccessorError::Metadata(_)));
    }

    #[tokio::test]
    async fn stale_variants_are_all_removed() {
        let (store, accessor) = setup();
        put(&store, "/docs/a", b"bare").await;
        put(&store, "/docs/a$.txt", b"text").await;
        put(&store, "/docs/a$.html", b"html").await;
        put(&store, "/docs/a.txt", b"independent").await;
        put(&store, "/docs/a.meta", b"").await;
        put(&store, "/docs/a/child", b"nested").await;

        accessor
            .remove_stale_variants(&id("/docs/a"), "/docs/a$.html")
            .await
            .unwrap();
        assert_eq!(
            store.keys(),
            vec!["/docs/a$.html", "/docs/a.meta", "/docs/a.txt", "/docs/a/child"]
        );
    }

    #[tokio::test]
    async fn rollback_without_sidecar_only_propagates() {
        let (store, accessor) = setup();
        put(&store, "/docs/a.meta", b"").await;
        let err = accessor
            .with_sidecar_rollback(None, async { Err::<(), _>(StoreError::Backend("boom".into())) })
            .await
            .unwrap_err();
        assert!(matches!(err, AccessorError::Storage(_)));
        assert!(store.exists("/docs/a.meta").await.unwrap());
    }

    #[tokio::test]
    async fn metadata_on_missing_document_uses_base_key() {
        let (store, accessor) = setup();
        let mut metadata = MetadataSet::new(id("/docs/later"));
        metadata.add("urn:example:title", Term::literal("draft"));
        accessor.write_metadata(&id("/docs/later"), &metadata).await.unwrap();
        assert!(store.exists("/docs/later.meta").await.unwrap());
    }

    #[tokio::test]
    async fn metadata_on_variant_drops_its_implied_type() {
        let (store, accessor) = setup();
        put(&store, "/docs/a$.html", b"<p>").await;
        let mut metadata = MetadataSet::new(id("/docs/a"));
        metadata.set_content_type(Some("text/html"));
        accessor.write_metadata(&id("/docs/a"), &metadata).await.unwrap();
        assert!(!store.exists("/docs/a.meta").await.unwrap());

        let read = accessor.get_metadata(&id("/docs/a")).await.unwrap();
        assert_eq!(read.content_type(), Some("text/html"));
    }
}
