//! Data types for stored points and search results.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The payload key under which a point's source text is stored.
pub const PAYLOAD_TEXT_KEY: &str = "text";

/// The distance metric used by a collection.
///
/// Fixed at collection-creation time and not overridable per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distance {
    /// Cosine similarity; higher scores are more similar.
    Cosine,
}

/// The persisted unit in the vector store.
///
/// Every write generates a fresh id via [`Point::new`]; ids are never reused
/// across retries of the same logical store operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Point {
    /// Unique identifier, generated per write.
    pub id: Uuid,
    /// The embedding vector. Its length must match the collection's
    /// configured vector size.
    pub vector: Vec<f32>,
    /// The source text this vector was computed from.
    pub payload: String,
}

impl Point {
    /// Wrap a vector and its source text in a point with a fresh id.
    pub fn new(vector: Vec<f32>, payload: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), vector, payload: payload.into() }
    }
}

/// A stored point returned from a similarity search, with its score.
///
/// Produced only in response to a query, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPoint {
    /// The stored point's id.
    pub id: String,
    /// Similarity score; higher is more similar.
    pub score: f32,
    /// The stored payload text.
    pub payload: String,
}

/// A RAG query result: a retrieved segment with its relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchItem {
    /// The matched point's id.
    pub id: String,
    /// Relevance score; higher is more similar.
    pub score: f32,
    /// The matched segment text.
    pub payload: String,
}

impl From<ScoredPoint> for SearchItem {
    fn from(point: ScoredPoint) -> Self {
        Self { id: point.id, score: point.score, payload: point.payload }
    }
}
