use async_trait::async_trait;
use bucketpod_types::{ByteStream, MetadataSet, Representation, ResourceIdentifier};
use futures::stream::BoxStream;

use crate::error::AccessorResult;

/// Single-pass sequence of child metadata records.
///
/// Consume it once; it cannot be restarted. Dropping it early has no effect
/// on the store.
pub type ChildStream = BoxStream<'static, AccessorResult<MetadataSet>>;

/// Resource-storage contract exposed to the hosting resource server.
///
/// Containers are identifiers ending in `/`; everything else is a document.
/// No operation locks, retries, or imposes a timeout; callers that need a
/// deadline wrap the returned futures themselves.
#[async_trait]
pub trait DataAccessor: Send + Sync {
    /// Fails with `UnsupportedMediaType` unless the representation is binary.
    fn can_handle(&self, representation: &Representation) -> AccessorResult<()>;

    /// The bytes of a document.
    async fn get_data(&self, identifier: &ResourceIdentifier) -> AccessorResult<ByteStream>;

    /// Stored metadata merged with live, store-derived fields.
    async fn get_metadata(&self, identifier: &ResourceIdentifier) -> AccessorResult<MetadataSet>;

    /// One metadata record per direct child of a container.
    async fn get_children(&self, identifier: &ResourceIdentifier) -> AccessorResult<ChildStream>;

    /// Store a document: metadata sidecar first, then data.
    async fn write_document(
        &self,
        identifier: &ResourceIdentifier,
        data: ByteStream,
        metadata: &MetadataSet,
    ) -> AccessorResult<()>;

    /// Make a container exist and store its metadata.
    async fn write_container(
        &self,
        identifier: &ResourceIdentifier,
        metadata: &MetadataSet,
    ) -> AccessorResult<()>;

    /// Store only the metadata sidecar.
    async fn write_metadata(
        &self,
        identifier: &ResourceIdentifier,
        metadata: &MetadataSet,
    ) -> AccessorResult<()>;

    /// Remove a resource and its sidecar.
    ///
    /// Deleting a container removes only its placeholder and sidecar; keys
    /// below it are untouched. Refusing to delete a non-empty container is
    /// left to the host server, which checks for children before calling.
    async fn delete_resource(&self, identifier: &ResourceIdentifier) -> AccessorResult<()>;
}
