use thiserror::Error;

/// Errors from identifier mapping.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapperError {
    /// The path is malformed or tries to escape its scope.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The identifier lies outside the configured base scope.
    #[error("identifier outside of storage scope: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type MapperResult<T> = Result<T, MapperError>;
