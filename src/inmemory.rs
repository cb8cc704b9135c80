//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] keeps collections in a `HashMap` behind a
//! `tokio::sync::RwLock`. It enforces the same schema contract as the
//! remote backends, which makes it the reference store for development and
//! tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{RetrievalError, Result};
use crate::point::{Distance, Point, ScoredPoint};
use crate::vectorstore::VectorStore;

#[derive(Debug)]
struct Collection {
    dimensions: usize,
    points: HashMap<String, Point>,
}

/// An in-memory [`VectorStore`] scoring with cosine similarity.
///
/// Tracks the declared dimensionality per collection and rejects writes,
/// queries, and re-creations that do not match it.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Cosine similarity of two vectors; 0.0 if either has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(
        &self,
        name: &str,
        dimensions: usize,
        _distance: Distance,
    ) -> Result<()> {
        let mut collections = self.collections.write().await;
        if let Some(existing) = collections.get(name) {
            if existing.dimensions != dimensions {
                return Err(RetrievalError::Schema {
                    collection: name.to_string(),
                    message: format!(
                        "collection exists with vector size {}, requested {dimensions}",
                        existing.dimensions
                    ),
                });
            }
            debug!(collection = name, "collection already exists with matching schema");
            return Ok(());
        }
        collections.insert(name.to_string(), Collection { dimensions, points: HashMap::new() });
        debug!(collection = name, dimensions, "created collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, points: &[Point]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(collection)
            .ok_or_else(|| RetrievalError::CollectionNotFound(collection.to_string()))?;
        for point in points {
            if point.vector.len() != target.dimensions {
                return Err(RetrievalError::Schema {
                    collection: collection.to_string(),
                    message: format!(
                        "point vector has {} dimensions, collection expects {}",
                        point.vector.len(),
                        target.dimensions
                    ),
                });
            }
        }
        for point in points {
            target.points.insert(point.id.to_string(), point.clone());
        }
        debug!(collection, count = points.len(), "upserted points");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
        min_score: Option<f32>,
    ) -> Result<Vec<ScoredPoint>> {
        let collections = self.collections.read().await;
        let target = collections
            .get(collection)
            .ok_or_else(|| RetrievalError::CollectionNotFound(collection.to_string()))?;
        if vector.len() != target.dimensions {
            return Err(RetrievalError::Schema {
                collection: collection.to_string(),
                message: format!(
                    "query vector has {} dimensions, collection expects {}",
                    vector.len(),
                    target.dimensions
                ),
            });
        }

        let mut scored: Vec<ScoredPoint> = target
            .points
            .values()
            .map(|point| ScoredPoint {
                id: point.id.to_string(),
                score: cosine_similarity(&point.vector, vector),
                payload: point.payload.clone(),
            })
            .filter(|hit| min_score.is_none_or(|threshold| hit.score >= threshold))
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }
}
