//! Error types for input document loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort loading. Recoverable problems inside a document are
/// reported as diagnostics instead.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The required field document does not exist.
    #[error("required input not found: {path}")]
    MissingInput { path: PathBuf },

    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed but does not have any accepted shape.
    #[error("unexpected document shape in {path}: {reason}")]
    UnexpectedShape { path: PathBuf, reason: String },

    /// The field document holds no form object.
    #[error("no form found in {path}")]
    NoForm { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, IngestError>;
