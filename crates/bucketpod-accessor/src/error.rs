use bucketpod_codec::CodecError;
use bucketpod_mapper::MapperError;
use bucketpod_store::StoreError;
use thiserror::Error;

/// Errors surfaced by the storage adapter.
///
/// `NotFound`, `BadRequest` and `UnsupportedMediaType` are expected outcomes
/// the caller maps onto its own responses. `Storage` wraps an opaque backend
/// failure and is never retried here.
#[derive(Debug, Error)]
pub enum AccessorError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("storage failure: {0}")]
    Storage(StoreError),

    #[error("invalid metadata sidecar: {0}")]
    Metadata(#[from] CodecError),

    #[error("failed to read representation data: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AccessorError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// A store "key absent" becomes `NotFound`; anything else stays opaque.
impl From<StoreError> for AccessorError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => Self::NotFound(key),
            other => Self::Storage(other),
        }
    }
}

impl From<MapperError> for AccessorError {
    fn from(e: MapperError) -> Self {
        match e {
            MapperError::NotFound(id) => Self::NotFound(id),
            MapperError::BadRequest(reason) => Self::BadRequest(reason),
            MapperError::Config(reason) => Self::Config(reason),
        }
    }
}

pub type AccessorResult<T> = Result<T, AccessorError>;
