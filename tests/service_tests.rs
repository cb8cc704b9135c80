//! End-to-end tests for the embedding and RAG services over the in-memory
//! store, using a deterministic bag-of-words embedder as the provider.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ragkit::{
    CollectionRole, Distance, EmbeddingProvider, HeuristicTokenizer, InMemoryVectorStore, Point,
    RagService, Result, RetrievalConfig, RetrievalError, ScoredPoint, VectorDbService,
    VectorStore, embed_bounded,
};

const DIM: usize = 64;

/// Deterministic test embedder: hashed bag of words, L2-normalized.
///
/// Texts sharing words get proportionally similar vectors, which is enough
/// cosine structure to exercise retrieval without a real model.
struct BagOfWordsEmbedder {
    calls: AtomicUsize,
}

impl BagOfWordsEmbedder {
    fn new() -> Self {
        Self { calls: AtomicUsize::new(0) }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vectorize(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; DIM];
        for word in text.to_lowercase().split(|c: char| !c.is_alphanumeric()) {
            if word.is_empty() {
                continue;
            }
            // FNV-1a, stable across runs
            let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
            for byte in word.bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(0x0100_0000_01b3);
            }
            vector[(hash % DIM as u64) as usize] += 1.0;
        }
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for BagOfWordsEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::vectorize(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|text| Self::vectorize(text)).collect())
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

/// Store wrapper that counts calls, for asserting that validation rejects
/// input before anything reaches the store.
struct CountingStore {
    inner: InMemoryVectorStore,
    calls: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self { inner: InMemoryVectorStore::new(), calls: AtomicUsize::new(0) }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorStore for CountingStore {
    async fn create_collection(
        &self,
        name: &str,
        dimensions: usize,
        distance: Distance,
    ) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create_collection(name, dimensions, distance).await
    }

    async fn upsert(&self, collection: &str, points: &[Point]) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.upsert(collection, points).await
    }

    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
        min_score: Option<f32>,
    ) -> Result<Vec<ScoredPoint>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.search(collection, vector, limit, min_score).await
    }
}

fn config() -> RetrievalConfig {
    RetrievalConfig::builder()
        .embedding_collection("embeddings", DIM)
        .rag_collection("rag-documents", DIM)
        .search_limit(5)
        .max_segment_tokens(100)
        .overlap_tokens(20)
        .min_relevance_score(0.5)
        .build()
        .unwrap()
}

fn rag_service(
    provider: Arc<BagOfWordsEmbedder>,
    store: Arc<CountingStore>,
) -> RagService {
    RagService::new(&config(), provider, store, Arc::new(HeuristicTokenizer))
}

#[tokio::test]
async fn persist_then_search_finds_the_original_text() {
    let provider = Arc::new(BagOfWordsEmbedder::new());
    let store = Arc::new(CountingStore::new());
    let service = VectorDbService::new(config(), provider, store);

    service.create_collection(CollectionRole::Embedding).await.unwrap();
    let vectors = service.persist("hello world", CollectionRole::Embedding).await.unwrap();
    assert_eq!(vectors.len(), 1);
    assert_eq!(vectors[0].len(), DIM);

    let hits = service.search("hello world", CollectionRole::Embedding).await.unwrap();
    assert!(!hits.is_empty());
    assert_eq!(hits[0].payload, "hello world");
}

#[tokio::test]
async fn preview_does_not_touch_the_store() {
    let provider = Arc::new(BagOfWordsEmbedder::new());
    let store = Arc::new(CountingStore::new());
    let service = VectorDbService::new(config(), Arc::clone(&provider) as _, Arc::clone(&store) as _);

    let vectors = service.preview("some text to inspect").await.unwrap();
    assert_eq!(vectors.len(), 1);
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn roles_resolve_to_separate_collections() {
    let provider = Arc::new(BagOfWordsEmbedder::new());
    let store = Arc::new(CountingStore::new());
    let service = VectorDbService::new(config(), provider, Arc::clone(&store) as _);

    service.create_collection(CollectionRole::Embedding).await.unwrap();
    service.persist("only in the embedding collection", CollectionRole::Embedding).await.unwrap();

    // The rag collection was never created, so searching it must fail.
    let err = service.search("anything", CollectionRole::Rag).await.unwrap_err();
    assert!(matches!(err, RetrievalError::CollectionNotFound(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn empty_text_is_rejected_before_any_remote_call() {
    let provider = Arc::new(BagOfWordsEmbedder::new());
    let store = Arc::new(CountingStore::new());
    let service =
        VectorDbService::new(config(), Arc::clone(&provider) as _, Arc::clone(&store) as _);

    for result in [
        service.preview("  ").await,
        service.persist("", CollectionRole::Embedding).await,
        service.search("", CollectionRole::Embedding).await.map(|_| Vec::new()),
    ] {
        assert!(matches!(result.unwrap_err(), RetrievalError::Validation(_)));
    }
    assert_eq!(provider.call_count(), 0);
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn store_then_query_round_trip() {
    let provider = Arc::new(BagOfWordsEmbedder::new());
    let store = Arc::new(CountingStore::new());
    store.create_collection("rag-documents", DIM, Distance::Cosine).await.unwrap();
    let service = rag_service(provider, store);

    let stored = service.store_document("The sky is blue.").await.unwrap();
    assert_eq!(stored, 1);

    let results = service.query("what color is the sky", 1).await.unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].payload.contains("sky"));
    assert!(results[0].score >= 0.5);
}

#[tokio::test]
async fn unrelated_queries_fall_below_the_relevance_threshold() {
    let provider = Arc::new(BagOfWordsEmbedder::new());
    let store = Arc::new(CountingStore::new());
    store.create_collection("rag-documents", DIM, Distance::Cosine).await.unwrap();
    let service = rag_service(provider, store);

    service.store_document("The sky is blue.").await.unwrap();
    let results = service.query("bananas oranges apples", 3).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn long_documents_are_stored_as_multiple_segments() {
    let provider = Arc::new(BagOfWordsEmbedder::new());
    let store = Arc::new(CountingStore::new());
    store.create_collection("rag-documents", DIM, Distance::Cosine).await.unwrap();

    let config = RetrievalConfig::builder()
        .embedding_collection("embeddings", DIM)
        .rag_collection("rag-documents", DIM)
        .max_segment_tokens(5)
        .overlap_tokens(2)
        .min_relevance_score(0.15)
        .build()
        .unwrap();
    let service = RagService::new(
        &config,
        Arc::clone(&provider) as _,
        Arc::clone(&store) as _,
        Arc::new(HeuristicTokenizer),
    );

    let document = "Qdrant stores vectors in collections. Collections have a fixed size. \
                    Embeddings are generated from text. Retrieval ranks results by score. \
                    The highest scoring segments are returned first.";
    let stored = service.store_document(document).await.unwrap();
    assert!(stored > 1, "expected multiple segments, got {stored}");

    let results = service.query("how are vectors stored", 3).await.unwrap();
    assert!(!results.is_empty());
    for window in results.windows(2) {
        assert!(window[0].score >= window[1].score);
    }
}

#[tokio::test]
async fn zero_max_results_is_rejected_before_any_remote_call() {
    let provider = Arc::new(BagOfWordsEmbedder::new());
    let store = Arc::new(CountingStore::new());
    let service = rag_service(Arc::clone(&provider), Arc::clone(&store));

    let err = service.query("a valid prompt", 0).await.unwrap_err();
    assert!(matches!(err, RetrievalError::Validation(_)), "unexpected error: {err}");
    assert_eq!(provider.call_count(), 0);
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn empty_document_is_rejected_before_any_remote_call() {
    let provider = Arc::new(BagOfWordsEmbedder::new());
    let store = Arc::new(CountingStore::new());
    let service = rag_service(Arc::clone(&provider), Arc::clone(&store));

    let err = service.store_document(" \n ").await.unwrap_err();
    assert!(matches!(err, RetrievalError::Validation(_)), "unexpected error: {err}");
    assert_eq!(provider.call_count(), 0);
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn storing_into_a_missing_collection_surfaces_not_found() {
    let provider = Arc::new(BagOfWordsEmbedder::new());
    let store = Arc::new(CountingStore::new());
    let service = rag_service(provider, store);

    let err = service.store_document("never stored").await.unwrap_err();
    assert!(matches!(err, RetrievalError::CollectionNotFound(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn bounded_embedding_preserves_input_order() {
    let provider = BagOfWordsEmbedder::new();
    let texts = ["first text", "second text", "third text", "fourth text"];

    let bounded = embed_bounded(&provider, &texts, 2).await.unwrap();
    let mut sequential = Vec::new();
    for text in &texts {
        sequential.push(provider.embed(text).await.unwrap());
    }
    assert_eq!(bounded, sequential);
}
