//! Configuration for the retrieval services.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RetrievalError, Result};

/// The schema-relevant settings of one named collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionSettings {
    /// The collection name in the vector store.
    pub name: String,
    /// The fixed dimensionality of vectors in this collection.
    pub vector_size: usize,
}

/// Which of the two configured collections an operation targets.
///
/// The generic `embedding` collection and the `rag` collection are
/// independently named and independently sized; a role resolves to its
/// concrete settings via [`CollectionRole::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionRole {
    /// The general-purpose embedding collection.
    Embedding,
    /// The RAG document-segment collection.
    Rag,
}

impl CollectionRole {
    /// Look up the settings for this role in the given configuration.
    pub fn resolve<'a>(&self, config: &'a RetrievalConfig) -> &'a CollectionSettings {
        match self {
            Self::Embedding => &config.embedding_collection,
            Self::Rag => &config.rag_collection,
        }
    }
}

impl fmt::Display for CollectionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedding => f.write_str("embedding"),
            Self::Rag => f.write_str("rag"),
        }
    }
}

impl FromStr for CollectionRole {
    type Err = RetrievalError;

    /// Parse a role name case-insensitively.
    ///
    /// Unknown names are rejected with [`RetrievalError::Validation`] so
    /// invalid roles never reach the network.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "embedding" => Ok(Self::Embedding),
            "rag" => Ok(Self::Rag),
            other => Err(RetrievalError::Validation(format!(
                "invalid collection role '{other}', valid roles: embedding, rag"
            ))),
        }
    }
}

/// Configuration parameters for the retrieval services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    /// Settings for the general-purpose embedding collection.
    pub embedding_collection: CollectionSettings,
    /// Settings for the RAG collection.
    pub rag_collection: CollectionSettings,
    /// Fixed result count for role-based search.
    pub search_limit: usize,
    /// Maximum segment size for document splitting, in tokens.
    pub max_segment_tokens: usize,
    /// Overlap between consecutive segments, in tokens.
    pub overlap_tokens: usize,
    /// Minimum relevance score for RAG query results.
    pub min_relevance_score: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            embedding_collection: CollectionSettings {
                name: "embeddings".to_string(),
                vector_size: 1536,
            },
            rag_collection: CollectionSettings {
                name: "rag-documents".to_string(),
                vector_size: 384,
            },
            search_limit: 5,
            max_segment_tokens: 100,
            overlap_tokens: 20,
            min_relevance_score: 0.7,
        }
    }
}

impl RetrievalConfig {
    /// Create a new builder for constructing a [`RetrievalConfig`].
    pub fn builder() -> RetrievalConfigBuilder {
        RetrievalConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RetrievalConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrievalConfigBuilder {
    config: RetrievalConfig,
}

impl RetrievalConfigBuilder {
    /// Set the name and vector size of the embedding collection.
    pub fn embedding_collection(mut self, name: impl Into<String>, vector_size: usize) -> Self {
        self.config.embedding_collection = CollectionSettings { name: name.into(), vector_size };
        self
    }

    /// Set the name and vector size of the RAG collection.
    pub fn rag_collection(mut self, name: impl Into<String>, vector_size: usize) -> Self {
        self.config.rag_collection = CollectionSettings { name: name.into(), vector_size };
        self
    }

    /// Set the fixed result count for role-based search.
    pub fn search_limit(mut self, limit: usize) -> Self {
        self.config.search_limit = limit;
        self
    }

    /// Set the maximum segment size in tokens.
    pub fn max_segment_tokens(mut self, tokens: usize) -> Self {
        self.config.max_segment_tokens = tokens;
        self
    }

    /// Set the overlap between consecutive segments in tokens.
    pub fn overlap_tokens(mut self, tokens: usize) -> Self {
        self.config.overlap_tokens = tokens;
        self
    }

    /// Set the minimum relevance score for RAG query results.
    pub fn min_relevance_score(mut self, score: f32) -> Self {
        self.config.min_relevance_score = score;
        self
    }

    /// Build the [`RetrievalConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Config`] if:
    /// - either collection name is empty or either vector size is zero
    /// - `search_limit == 0`
    /// - `max_segment_tokens == 0`
    /// - `overlap_tokens > max_segment_tokens`
    /// - `min_relevance_score` is outside `[-1.0, 1.0]`
    pub fn build(self) -> Result<RetrievalConfig> {
        let config = self.config;
        for settings in [&config.embedding_collection, &config.rag_collection] {
            if settings.name.is_empty() {
                return Err(RetrievalError::Config("collection name must not be empty".to_string()));
            }
            if settings.vector_size == 0 {
                return Err(RetrievalError::Config(format!(
                    "vector size for collection '{}' must be greater than zero",
                    settings.name
                )));
            }
        }
        if config.search_limit == 0 {
            return Err(RetrievalError::Config("search_limit must be greater than zero".to_string()));
        }
        if config.max_segment_tokens == 0 {
            return Err(RetrievalError::Config(
                "max_segment_tokens must be greater than zero".to_string(),
            ));
        }
        if config.overlap_tokens > config.max_segment_tokens {
            return Err(RetrievalError::Config(format!(
                "overlap_tokens ({}) must not exceed max_segment_tokens ({})",
                config.overlap_tokens, config.max_segment_tokens
            )));
        }
        if !(-1.0..=1.0).contains(&config.min_relevance_score) {
            return Err(RetrievalError::Config(format!(
                "min_relevance_score ({}) must be within [-1.0, 1.0]",
                config.min_relevance_score
            )));
        }
        Ok(config)
    }
}
