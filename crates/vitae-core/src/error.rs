use thiserror::Error;

use crate::config::ConfigError;
use crate::ingest::ReadError;
use crate::ner::NerError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Ner(#[from] NerError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True when the document was rejected because of its extension or format.
    #[must_use]
    pub const fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::Read(ReadError::UnsupportedFormat(_)))
    }

    /// True when a reader could not decode the document body.
    #[must_use]
    pub const fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            Self::Read(ReadError::Encoding(_) | ReadError::Malformed { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
