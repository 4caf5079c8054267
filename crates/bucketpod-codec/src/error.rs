use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("unsupported metadata format: {0}")]
    UnsupportedFormat(String),

    #[error("metadata is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }
}

pub type CodecResult<T> = Result<T, CodecError>;
