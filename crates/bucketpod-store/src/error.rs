/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No object is stored under the key.
    #[error("object not found: {0}")]
    NotFound(String),

    /// A non-overwriting put found the key already taken.
    #[error("object already exists: {0}")]
    AlreadyExists(String),

    /// The key cannot be stored by this backend.
    #[error("invalid storage key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other backend failure (auth, network, quota).
    #[error("backend error: {0}")]
    Backend(String),

    /// The store could not be constructed from its configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Returns `true` if this error means "key absent".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
