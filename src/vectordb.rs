//! Role-based embedding service: preview, persist, and search embeddings.
//!
//! [`VectorDbService`] serves the generic embedding surface. Text is
//! embedded as a single unit (no chunking) and stored into one of the two
//! configured collections selected by [`CollectionRole`]; searches return
//! raw scored points with no relevance filtering.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::{CollectionRole, RetrievalConfig};
use crate::embedding::EmbeddingProvider;
use crate::error::{RetrievalError, Result};
use crate::point::{Distance, Point, ScoredPoint};
use crate::vectorstore::VectorStore;

/// Reject empty mandatory text before any remote call is made.
pub(crate) fn require_text(text: &str, field: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(RetrievalError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Orchestrates embedding preview, persistence, and raw similarity search
/// against the role-selected collection.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::{CollectionRole, RetrievalConfig, VectorDbService};
///
/// let service = VectorDbService::new(config, provider, store);
/// service.create_collection(CollectionRole::Embedding).await?;
/// service.persist("hello world", CollectionRole::Embedding).await?;
/// let hits = service.search("hello world", CollectionRole::Embedding).await?;
/// ```
pub struct VectorDbService {
    config: RetrievalConfig,
    provider: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
}

impl VectorDbService {
    /// Create a new service over the given provider and store.
    pub fn new(
        config: RetrievalConfig,
        provider: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self { config, provider, store }
    }

    /// Create the collection for the given role with cosine distance.
    ///
    /// Idempotent for an unchanged schema; creation is explicit and never
    /// happens implicitly on the write or search paths.
    pub async fn create_collection(&self, role: CollectionRole) -> Result<()> {
        let settings = role.resolve(&self.config);
        self.store
            .create_collection(&settings.name, settings.vector_size, Distance::Cosine)
            .await?;
        info!(collection = %settings.name, %role, "collection ready");
        Ok(())
    }

    /// Embed `text` and return the vectors without persisting anything.
    pub async fn preview(&self, text: &str) -> Result<Vec<Vec<f32>>> {
        require_text(text, "text")?;
        self.provider.embed_batch(&[text]).await
    }

    /// Embed `text` as a single unit and upsert the result into the role's
    /// collection, one fresh-id point per vector with the text as payload.
    ///
    /// Returns the embedded vectors.
    pub async fn persist(&self, text: &str, role: CollectionRole) -> Result<Vec<Vec<f32>>> {
        require_text(text, "text")?;
        let settings = role.resolve(&self.config);

        let vectors = self.provider.embed_batch(&[text]).await?;
        let points: Vec<Point> =
            vectors.iter().map(|vector| Point::new(vector.clone(), text)).collect();

        self.store.upsert(&settings.name, &points).await.inspect_err(|e| {
            error!(collection = %settings.name, error = %e, "failed to persist embeddings");
        })?;

        info!(collection = %settings.name, count = points.len(), "persisted embeddings");
        Ok(vectors)
    }

    /// Embed the query text and search the role's collection.
    ///
    /// The result count is bounded by the configured `search_limit`; no
    /// score filtering is applied.
    pub async fn search(&self, text: &str, role: CollectionRole) -> Result<Vec<ScoredPoint>> {
        require_text(text, "text")?;
        let settings = role.resolve(&self.config);

        let vector = self.provider.embed(text).await?;
        let hits =
            self.store.search(&settings.name, &vector, self.config.search_limit, None).await?;

        info!(collection = %settings.name, result_count = hits.len(), "search completed");
        Ok(hits)
    }
}
