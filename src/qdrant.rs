//! Qdrant vector store backend.
//!
//! [`QdrantVectorStore`] implements [`VectorStore`] over the
//! [qdrant-client](https://docs.rs/qdrant-client) gRPC API. Only available
//! when the `qdrant` feature is enabled.
//!
//! # Example
//!
//! ```rust,ignore
//! use ragkit::qdrant::QdrantVectorStore;
//! use ragkit::{Distance, VectorStore};
//!
//! let store = QdrantVectorStore::new("http://localhost:6334")?;
//! store.create_collection("rag-documents", 384, Distance::Cosine).await?;
//! ```

use async_trait::async_trait;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance as QdrantDistance, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, VectorParamsBuilder, vectors_config,
};
use qdrant_client::{Payload, Qdrant};
use tracing::debug;

use crate::error::{RetrievalError, Result};
use crate::point::{Distance, PAYLOAD_TEXT_KEY, Point, ScoredPoint};
use crate::vectorstore::VectorStore;

/// A [`VectorStore`] backed by [Qdrant](https://qdrant.tech/).
///
/// Collections map to Qdrant collections; point payloads carry the source
/// text under the [`PAYLOAD_TEXT_KEY`] key. The backing store serializes
/// conflicting writes by point id.
pub struct QdrantVectorStore {
    client: Qdrant,
}

impl QdrantVectorStore {
    /// Connect to a Qdrant instance at the given URL.
    pub fn new(url: &str) -> Result<Self> {
        let client = Qdrant::from_url(url).build().map_err(|e| RetrievalError::VectorStore {
            backend: "qdrant".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { client })
    }

    /// Wrap an existing Qdrant client.
    pub fn from_client(client: Qdrant) -> Self {
        Self { client }
    }

    /// Classify a Qdrant error by the contract it violates.
    ///
    /// The gRPC client surfaces missing collections and dimension mismatches
    /// only through the status message, so classification is text-based.
    fn map_err(collection: &str, e: qdrant_client::QdrantError) -> RetrievalError {
        let message = e.to_string();
        let lowered = message.to_lowercase();
        if lowered.contains("doesn't exist") || lowered.contains("not found") {
            RetrievalError::CollectionNotFound(collection.to_string())
        } else if lowered.contains("dimension") {
            RetrievalError::Schema { collection: collection.to_string(), message }
        } else {
            RetrievalError::VectorStore { backend: "qdrant".to_string(), message }
        }
    }

    /// The declared vector size of an existing collection, if reported.
    async fn existing_vector_size(&self, name: &str) -> Result<Option<u64>> {
        let info = self.client.collection_info(name).await.map_err(|e| Self::map_err(name, e))?;
        let params = info
            .result
            .and_then(|c| c.config)
            .and_then(|c| c.params)
            .and_then(|p| p.vectors_config)
            .and_then(|v| v.config);
        Ok(match params {
            Some(vectors_config::Config::Params(p)) => Some(p.size),
            _ => None,
        })
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn create_collection(
        &self,
        name: &str,
        dimensions: usize,
        distance: Distance,
    ) -> Result<()> {
        let collections =
            self.client.list_collections().await.map_err(|e| Self::map_err(name, e))?;
        if collections.collections.iter().any(|c| c.name == name) {
            if let Some(size) = self.existing_vector_size(name).await? {
                if size != dimensions as u64 {
                    return Err(RetrievalError::Schema {
                        collection: name.to_string(),
                        message: format!(
                            "collection exists with vector size {size}, requested {dimensions}"
                        ),
                    });
                }
            }
            debug!(collection = name, "collection already exists with matching schema");
            return Ok(());
        }

        let metric = match distance {
            Distance::Cosine => QdrantDistance::Cosine,
        };
        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(dimensions as u64, metric)),
            )
            .await
            .map_err(|e| Self::map_err(name, e))?;

        debug!(collection = name, dimensions, "created collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, points: &[Point]) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }

        let structs: Vec<PointStruct> = points
            .iter()
            .map(|point| {
                let mut payload = serde_json::Map::new();
                payload.insert(
                    PAYLOAD_TEXT_KEY.to_string(),
                    serde_json::Value::String(point.payload.clone()),
                );
                let payload =
                    Payload::try_from(serde_json::Value::Object(payload)).unwrap_or_default();
                PointStruct::new(point.id.to_string(), point.vector.clone(), payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, structs).wait(true))
            .await
            .map_err(|e| Self::map_err(collection, e))?;

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
        let mut request =
            SearchPointsBuilder::new(collection, vector.to_vec(), limit as u64).with_payload(true);
        if let Some(threshold) = min_score {
            request = request.score_threshold(threshold);
        }

        let response =
            self.client.search_points(request).await.map_err(|e| Self::map_err(collection, e))?;

        let hits = response
            .result
            .into_iter()
            .map(|scored| {
                let id = scored
                    .id
                    .as_ref()
                    .and_then(|pid| match &pid.point_id_options {
                        Some(PointIdOptions::Uuid(s)) => Some(s.clone()),
                        Some(PointIdOptions::Num(n)) => Some(n.to_string()),
                        None => None,
                    })
                    .unwrap_or_default();
                let payload = scored
                    .payload
                    .get(PAYLOAD_TEXT_KEY)
                    .and_then(|value| match &value.kind {
                        Some(Kind::StringValue(s)) => Some(s.clone()),
                        _ => None,
                    })
                    .unwrap_or_default();
                ScoredPoint { id, score: scored.score, payload }
            })
            .collect();

        Ok(hits)
    }
}
