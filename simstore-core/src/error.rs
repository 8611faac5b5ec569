//! Error types for simstore operations.

use thiserror::Error;

/// Result type alias using simstore's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during simstore operations.
///
/// Every error is reported before any state is touched: a failed append or
/// load leaves the store exactly as it was.
#[derive(Debug, Error)]
pub enum Error {
    /// `append` was called with no items.
    #[error("empty batch: append requires at least one item")]
    EmptyBatch,

    /// Embedding or query length differs from the store's dimensionality.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Zero-length embedding provided where a non-empty one is required.
    #[error("empty embedding not allowed")]
    EmptyEmbedding,

    /// Operation requires stored data but the store holds none.
    #[error("store is empty")]
    EmptyStore,

    /// Decoded buffer does not have the expected `{embeddings, data}` shape.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Raw bytes could not be decoded at all.
    #[error("corrupt data: {0}")]
    CorruptData(String),

    /// Search options out of range.
    #[error("invalid search options: {0}")]
    InvalidOptions(String),

    /// Store configuration is invalid or could not be parsed.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Encoding the store snapshot failed.
    #[error("encode failed: {0}")]
    Encode(String),

    /// A blocking task backing an async operation failed to complete.
    #[error("task failed: {0}")]
    TaskFailed(String),
}
