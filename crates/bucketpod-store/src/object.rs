use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a `head` call on an existing key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectHead {
    pub key: String,
    pub content_type: Option<String>,
    pub size: u64,
    pub modified_at: DateTime<Utc>,
}

/// One key returned by a prefix listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListEntry {
    pub key: String,
    pub size: u64,
    pub modified_at: DateTime<Utc>,
}

/// Access level applied to a written object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

/// Options for a single `put`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PutOptions {
    /// When `false`, the put fails with `AlreadyExists` if the key is taken.
    pub overwrite: bool,
    /// `None` applies the store's configured default.
    pub visibility: Option<Visibility>,
    pub content_type: Option<String>,
}

impl Default for PutOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            visibility: None,
            content_type: None,
        }
    }
}

impl PutOptions {
    /// Options for a create-only put.
    pub fn create_only() -> Self {
        Self {
            overwrite: false,
            ..Default::default()
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}
