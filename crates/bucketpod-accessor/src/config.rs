use bucketpod_codec::TURTLE;
use serde::{Deserialize, Serialize};

/// Settings for [`BucketAccessor`](crate::BucketAccessor).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessorConfig {
    /// Serialization used for metadata sidecars.
    pub metadata_format: String,
}

impl Default for AccessorConfig {
    fn default() -> Self {
        Self {
            metadata_format: TURTLE.into(),
        }
    }
}
