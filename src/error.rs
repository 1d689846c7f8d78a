//! Error types for the upload pipeline

use std::path::PathBuf;
use thiserror::Error;

use crate::pinning::PinError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("image asset not found: {}", .0.display())]
    AssetNotFound(PathBuf),
    #[error("failed to read image asset {}: {source}", path.display())]
    AssetUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("missing configuration: {0} is not set")]
    MissingCredential(&'static str),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Pin(#[from] PinError),
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize metadata: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("metadata failed schema validation: {0}")]
    InvalidMetadata(String),
    #[error("batch size must be at least 1")]
    EmptyBatch,
}

impl Error {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }
}
