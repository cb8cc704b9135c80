//! RAG retrieval service: document ingestion and thresholded semantic query.
//!
//! Ingestion flows one direction (text → segments → vectors → store), query
//! the other (text → vector → store → ranked, filtered results). This is
//! pure retrieval; how the results augment a language-model prompt is the
//! caller's concern.

use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::RecursiveSplitter;
use crate::config::RetrievalConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::{RetrievalError, Result};
use crate::point::{Point, SearchItem};
use crate::tokenizer::Tokenizer;
use crate::vectordb::require_text;
use crate::vectorstore::VectorStore;

/// Orchestrates the RAG collection: chunked ingestion and score-thresholded
/// semantic search.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::{HeuristicTokenizer, RagService, RetrievalConfig};
///
/// let service = RagService::new(&config, provider, store, Arc::new(HeuristicTokenizer));
/// service.store_document("The sky is blue.").await?;
/// let results = service.query("what color is the sky", 1).await?;
/// ```
pub struct RagService {
    provider: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    splitter: RecursiveSplitter,
    collection: String,
    min_score: f32,
}

impl RagService {
    /// Create a new service over the given provider and store.
    ///
    /// Segment bounds, the collection name, and the relevance threshold are
    /// fixed from `config` for the lifetime of the service.
    pub fn new(
        config: &RetrievalConfig,
        provider: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Self {
        Self {
            provider,
            store,
            splitter: RecursiveSplitter::new(
                config.max_segment_tokens,
                config.overlap_tokens,
                tokenizer,
            ),
            collection: config.rag_collection.name.clone(),
            min_score: config.min_relevance_score,
        }
    }

    /// Split a document into segments, batch-embed them, and upsert one
    /// fresh-id point per segment into the RAG collection.
    ///
    /// The whole batch is embedded in one provider call and written in one
    /// upsert; an interrupted write is a retryable inconsistency, and a
    /// retry regenerates every point id. Returns the number of segments
    /// stored.
    pub async fn store_document(&self, text: &str) -> Result<usize> {
        require_text(text, "document")?;

        let segments = self.splitter.split(text);
        let texts: Vec<&str> = segments.iter().map(String::as_str).collect();

        let embeddings = self.provider.embed_batch(&texts).await.inspect_err(|e| {
            error!(segment_count = segments.len(), error = %e, "embedding failed during ingestion");
        })?;
        if embeddings.len() != segments.len() {
            return Err(RetrievalError::Embedding {
                provider: "batch".to_string(),
                message: format!(
                    "provider returned {} vectors for {} segments",
                    embeddings.len(),
                    segments.len()
                ),
            });
        }

        let points: Vec<Point> = segments
            .into_iter()
            .zip(embeddings)
            .map(|(segment, vector)| Point::new(vector, segment))
            .collect();

        let segment_count = points.len();
        self.store.upsert(&self.collection, &points).await.map_err(|e| {
            error!(collection = %self.collection, segment_count, error = %e, "upsert failed");
            match e {
                RetrievalError::VectorStore { backend, message } => RetrievalError::VectorStore {
                    backend,
                    message: format!("{segment_count} segments not persisted: {message}"),
                },
                other => other,
            }
        })?;

        info!(collection = %self.collection, segment_count, "stored document");
        Ok(segment_count)
    }

    /// Embed the prompt, search the RAG collection for up to `max_results`
    /// candidates, and return those at or above the relevance threshold in
    /// descending score order.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Validation`] for an empty prompt or a zero
    /// `max_results`, before any remote call is made.
    pub async fn query(&self, prompt: &str, max_results: usize) -> Result<Vec<SearchItem>> {
        if max_results == 0 {
            return Err(RetrievalError::Validation(
                "max_results must be greater than zero".to_string(),
            ));
        }
        require_text(prompt, "prompt")?;

        let vector = self.provider.embed(prompt).await?;
        let hits = self
            .store
            .search(&self.collection, &vector, max_results, Some(self.min_score))
            .await?;

        let results: Vec<SearchItem> = hits.into_iter().map(SearchItem::from).collect();
        info!(collection = %self.collection, result_count = results.len(), "query completed");
        Ok(results)
    }
}
