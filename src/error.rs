//! Error types for the `ragkit` crate.

use thiserror::Error;

/// Errors that can occur in retrieval operations.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// An input was rejected before any remote call was made.
    ///
    /// Covers unknown collection roles, a zero result limit, and empty
    /// mandatory text.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A vector's dimensionality does not match the collection's declared size.
    #[error("Schema mismatch in collection '{collection}': {message}")]
    Schema {
        /// The collection whose schema was violated.
        collection: String,
        /// A description of the mismatch.
        message: String,
    },

    /// The named collection does not exist.
    ///
    /// Collections are created explicitly; write and search paths never
    /// create them implicitly.
    #[error("Collection '{0}' not found")]
    CollectionNotFound(String),

    /// The embedding provider failed or was unreachable.
    ///
    /// Retry policy belongs to the caller, not to this crate.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The vector store backend failed or was unreachable.
    #[error("Vector store error ({backend}): {message}")]
    VectorStore {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;
