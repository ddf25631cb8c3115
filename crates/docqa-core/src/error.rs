//! Error taxonomy shared across the DocQA system

use thiserror::Error;

use crate::types::SessionStatus;

/// Errors produced by the retrieval pipeline and its collaborators
#[derive(Error, Debug)]
pub enum Error {
    #[error("tokenization failed: {0}")]
    Tokenization(String),

    #[error("document contains no extractable text")]
    EmptyDocument,

    #[error("embedding service error: {0}")]
    EmbeddingService(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("session not ready: current state is {0}")]
    SessionNotReady(SessionStatus),

    #[error("generation service error: {0}")]
    GenerationService(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("text extraction failed: {0}")]
    Extraction(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("internal state error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the failure is transient and worth retrying.
    ///
    /// Timeouts are treated identically to network failures: retry with
    /// backoff, then surface as a service error.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Timeout(_))
    }
}

/// Result type alias used throughout the DocQA crates
pub type Result<T> = std::result::Result<T, Error>;
