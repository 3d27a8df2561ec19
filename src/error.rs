// File: src/error.rs
use thiserror::Error;

/// Every fallible operation in the crate reports one of these.
/// Conversion itself never fails; only building tables and touching files can.
#[derive(Debug, Error)]
pub enum PreetiError {
    #[error("invalid mapping for {code:?}: {reason}")]
    InvalidMapping { code: String, reason: String },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("table snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl PreetiError {
    pub(crate) fn invalid_mapping(code: impl Into<String>, reason: impl Into<String>) -> Self {
        PreetiError::InvalidMapping {
            code: code.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PreetiError>;
