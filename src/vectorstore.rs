//! Vector store trait for collection lifecycle, upsert, and search.

use async_trait::async_trait;

use crate::error::Result;
use crate::point::{Distance, Point, ScoredPoint};

/// A storage backend for embedding vectors with similarity search.
///
/// Implementations manage named, schema-bound collections of [`Point`]s.
/// The store is the single source of truth for durable state and serializes
/// conflicting writes to the same point id internally (last-writer-wins on
/// upsert by id).
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::{Distance, InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.create_collection("docs", 384, Distance::Cosine).await?;
/// store.upsert("docs", &points).await?;
/// let hits = store.search("docs", &query_vector, 5, Some(0.7)).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Declare a collection's schema: fixed vector size and distance metric.
    ///
    /// Must be called before the first write to the collection. Repeating
    /// the call with the same schema succeeds; repeating it with a
    /// different schema fails with
    /// [`RetrievalError::Schema`](crate::RetrievalError::Schema).
    async fn create_collection(&self, name: &str, dimensions: usize, distance: Distance)
        -> Result<()>;

    /// Write or overwrite points by id as one batched operation.
    ///
    /// All points in one call must come from the same source text. Vectors
    /// whose length differs from the collection's declared size are rejected.
    async fn upsert(&self, collection: &str, points: &[Point]) -> Result<()>;

    /// Return up to `limit` points ordered by descending similarity score.
    ///
    /// If `min_score` is given, lower-scoring points are excluded even when
    /// that leaves fewer than `limit` results. Payload text is always
    /// returned.
    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
        min_score: Option<f32>,
    ) -> Result<Vec<ScoredPoint>>;
}
