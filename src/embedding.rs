//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap remote embedding backends behind a unified async
/// interface. Providers are stateless at this boundary: embedding is a pure
/// function of the text, even though the backing call is remote. Empty text
/// embeds deterministically rather than failing. Transient upstream failures
/// surface as [`RetrievalError::Embedding`](crate::RetrievalError::Embedding);
/// no retry happens here.
///
/// The default [`embed_batch`](EmbeddingProvider::embed_batch) implementation
/// calls [`embed`](EmbeddingProvider::embed) sequentially; backends that
/// support native batching should override it so a whole document costs one
/// round trip. For backends without native batching, [`embed_bounded`] runs
/// per-text calls concurrently under a limit.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// Output order matches input order 1:1.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}

/// Embed `texts` with at most `concurrency` in-flight provider calls.
///
/// An order-preserving alternative to [`EmbeddingProvider::embed_batch`] for
/// providers without native batching: bounds the number of simultaneous
/// upstream requests instead of the number of round trips.
pub async fn embed_bounded(
    provider: &dyn EmbeddingProvider,
    texts: &[&str],
    concurrency: usize,
) -> Result<Vec<Vec<f32>>> {
    stream::iter(texts.iter().map(|text| provider.embed(text)))
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}
