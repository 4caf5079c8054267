use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid resource identifier {0:?}: {1}")]
    InvalidIdentifier(String, String),

    #[error("invalid literal for {datatype}: {value:?}")]
    InvalidLiteral { datatype: String, value: String },
}
