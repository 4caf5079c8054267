use serde::{Deserialize, Serialize};

use crate::identifier::ResourceIdentifier;

/// Resolution of one identifier to one storage key, produced per call.
///
/// Links are never persisted. `content_type` is the type the mapper inferred
/// from (or encoded into) the key; it is `None` for containers and sidecars.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub identifier: ResourceIdentifier,
    pub storage_key: String,
    pub content_type: Option<String>,
    pub is_metadata: bool,
}

impl ResourceLink {
    pub fn new(identifier: ResourceIdentifier, storage_key: impl Into<String>) -> Self {
        Self {
            identifier,
            storage_key: storage_key.into(),
            content_type: None,
            is_metadata: false,
        }
    }

    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn metadata(mut self) -> Self {
        self.is_metadata = true;
        self.content_type = None;
        self
    }
}
