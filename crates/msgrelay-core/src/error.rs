//! Core error types.

use thiserror::Error;

use crate::types::MessageId;

/// Core store errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Update targeted an id absent from the collection.
    #[error("message {0} not found")]
    NotFound(MessageId),

    /// Reading or writing the data file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding the data file failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is a persistence failure rather than a lookup miss.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Serialization(_))
    }
}
