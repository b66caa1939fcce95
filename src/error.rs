//! Error types for strata.

use crate::config::ConfigError;

/// Errors that can occur around chunking.
///
/// Chunking a document never fails; these cover construction of a
/// [`ChunkConfig`](crate::ChunkConfig), decoding stored metadata, and the
/// collaborators driven by the ingestion pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The chunk configuration violates its ordering invariant.
    #[error("invalid chunk configuration: {0}")]
    Config(#[from] ConfigError),

    /// Flattened chunk metadata is missing a key or has the wrong type.
    #[error("invalid chunk metadata: {0}")]
    Metadata(String),

    /// Embedding model error.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Chunk store error.
    #[error("chunk store error: {0}")]
    Store(String),
}

/// Result type for strata operations.
pub type Result<T> = std::result::Result<T, Error>;
