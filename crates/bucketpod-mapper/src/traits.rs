use bucketpod_types::{ResourceIdentifier, ResourceLink};

use crate::error::MapperResult;

/// Maps resource identifiers onto storage keys.
///
/// Mapping is pure: implementations never touch the object store. Discovery
/// of which extension variant actually exists is left to the caller, which
/// uses [`IdentifierMapper::is_extension_variant`] to recognise candidates in
/// a prefix listing.
pub trait IdentifierMapper: Send + Sync {
    /// Resolve `identifier` to its primary key, or to its sidecar key when
    /// `want_sidecar` is set.
    ///
    /// For documents, `content_type` may change the chosen key (the mapper
    /// may append an extension for it). Sidecar keys never depend on it.
    ///
    /// Fails with `BadRequest` for traversal or malformed paths and with
    /// `NotFound` for identifiers outside the configured scope.
    fn resolve(
        &self,
        identifier: &ResourceIdentifier,
        want_sidecar: bool,
        content_type: Option<&str>,
    ) -> MapperResult<ResourceLink>;

    /// Suffix appended to a base key to form its sidecar key.
    fn metadata_suffix(&self) -> &str;

    /// Content type implied by a key's extension, if it has a known one.
    fn content_type_for_key(&self, key: &str) -> Option<String>;

    /// Whether `candidate` is `base_key` plus an extension this mapper
    /// appended for a content type.
    fn is_extension_variant(&self, base_key: &str, candidate: &str) -> bool;

    /// Name a document is addressed by, given the last segment of its key.
    ///
    /// Inverse of the extension appended by [`IdentifierMapper::resolve`], so
    /// a child listed from storage resolves back to the same key.
    fn document_name<'a>(&self, key_name: &'a str) -> &'a str {
        key_name
    }

    /// Whether `key` names a metadata sidecar.
    fn is_metadata_key(&self, key: &str) -> bool {
        key.ends_with(self.metadata_suffix())
    }
}
