//! # ragkit
//!
//! A retrieval core that turns raw text into searchable vector
//! representations and answers similarity queries against a persistent
//! vector store. Two surfaces share the same provider and store seams:
//!
//! - **Embedding surface** ([`VectorDbService`]) — preview embeddings for a
//!   text, persist them into a role-selected collection, and browse a
//!   collection by raw similarity.
//! - **RAG surface** ([`RagService`]) — split a document into token-bounded
//!   overlapping segments, batch-embed and store them, and answer semantic
//!   queries filtered by a minimum relevance score.
//!
//! Backends plug in behind two traits: [`EmbeddingProvider`] for turning
//! text into vectors and [`VectorStore`] for collections, upserts, and
//! nearest-neighbor search. [`InMemoryVectorStore`] ships by default; the
//! `qdrant` feature adds a [Qdrant](https://qdrant.tech/) gRPC backend and
//! the `openai` feature an OpenAI-compatible embedding provider.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragkit::{HeuristicTokenizer, InMemoryVectorStore, RagService, RetrievalConfig};
//!
//! let config = RetrievalConfig::builder().min_relevance_score(0.7).build()?;
//! let store = Arc::new(InMemoryVectorStore::new());
//! let provider = Arc::new(my_embedding_provider);
//!
//! let rag = RagService::new(&config, provider, store, Arc::new(HeuristicTokenizer));
//! rag.store_document("The sky is blue.").await?;
//! let results = rag.query("what color is the sky", 1).await?;
//! ```

pub mod chunking;
pub mod config;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod point;
pub mod rag;
pub mod tokenizer;
pub mod vectordb;
pub mod vectorstore;

#[cfg(feature = "openai")]
pub mod openai;
#[cfg(feature = "qdrant")]
pub mod qdrant;

pub use chunking::RecursiveSplitter;
pub use config::{CollectionRole, CollectionSettings, RetrievalConfig, RetrievalConfigBuilder};
pub use embedding::{EmbeddingProvider, embed_bounded};
pub use error::{Result, RetrievalError};
pub use inmemory::InMemoryVectorStore;
pub use point::{Distance, PAYLOAD_TEXT_KEY, Point, ScoredPoint, SearchItem};
pub use rag::RagService;
pub use tokenizer::{HeuristicTokenizer, Tokenizer};
pub use vectordb::VectorDbService;
pub use vectorstore::VectorStore;

#[cfg(feature = "openai")]
pub use openai::OpenAiEmbeddings;
#[cfg(feature = "qdrant")]
pub use qdrant::QdrantVectorStore;
