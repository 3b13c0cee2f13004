//! Engine facade wiring config, providers, and the vector store

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::AnswerSynthesizer;
use crate::index::{IndexManager, TrainParams};
use crate::providers::{ChatProvider, EmbeddingProvider, OllamaClient};
use crate::retrieval::Retriever;
use crate::store::{SqliteVectorStore, VectorStore};
use crate::types::{envelope, AnswerReport, Envelope, SearchReport, StatusReport, TrainReport};

/// Per-call overrides for a train run; unset fields fall back to config.
#[derive(Debug, Clone)]
pub struct TrainRequest {
    /// Corpus directory to ingest
    pub corpus_dir: Option<PathBuf>,
    /// Target collection
    pub collection: Option<String>,
    /// Embedding model
    pub embed_model: Option<String>,
    /// Chunk window size
    pub chunk_size: Option<usize>,
    /// Chunk overlap
    pub overlap: Option<usize>,
    /// Drop the prior collection first
    pub reset: bool,
}

impl Default for TrainRequest {
    fn default() -> Self {
        Self {
            corpus_dir: None,
            collection: None,
            embed_model: None,
            chunk_size: None,
            overlap: None,
            reset: true,
        }
    }
}

/// Per-call overrides for a search.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    /// The query text
    pub query: String,
    /// Target collection
    pub collection: Option<String>,
    /// Embedding model
    pub embed_model: Option<String>,
    /// Number of results
    pub top_k: Option<usize>,
}

/// Per-call overrides for answer synthesis.
#[derive(Debug, Clone, Default)]
pub struct AnswerRequest {
    /// The query text
    pub query: String,
    /// Target collection
    pub collection: Option<String>,
    /// Embedding model
    pub embed_model: Option<String>,
    /// Chat model
    pub chat_model: Option<String>,
    /// Number of results to ground on
    pub top_k: Option<usize>,
}

/// The assembled RAG pipeline.
///
/// Every operation is request-scoped and runs to completion on the calling
/// task; nothing outlives the call. Collections are shared state in the
/// store with no cross-operation locking, so a concurrent reset and search
/// on the same name can observe each other mid-flight.
pub struct RagEngine {
    config: RagConfig,
    index: IndexManager,
    retriever: Retriever,
    synthesizer: AnswerSynthesizer,
}

impl RagEngine {
    /// Build the production engine: Ollama providers plus the SQLite store
    /// from `config.storage`.
    pub fn new(config: RagConfig) -> Result<Self> {
        let ollama = Arc::new(OllamaClient::new(&config.llm));
        let store: Arc<dyn VectorStore> =
            Arc::new(SqliteVectorStore::open(&config.storage.db_path)?);
        Ok(Self::with_providers(
            config,
            store,
            ollama.clone(),
            ollama,
        ))
    }

    /// Build an engine over explicit collaborators (tests use stubs here).
    pub fn with_providers(
        config: RagConfig,
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        chat: Arc<dyn ChatProvider>,
    ) -> Self {
        let index = IndexManager::new(store.clone(), embedder.clone());
        let retriever = Retriever::new(store.clone(), embedder.clone());
        let synthesizer = AnswerSynthesizer::new(Retriever::new(store, embedder), chat);
        Self {
            config,
            index,
            retriever,
            synthesizer,
        }
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Ingest the corpus into a collection.
    pub async fn train(&self, req: &TrainRequest) -> Result<Envelope<TrainReport>> {
        let corpus_dir = req
            .corpus_dir
            .clone()
            .unwrap_or_else(|| self.config.corpus_dir.clone());
        let params = TrainParams {
            collection: self.collection_or_default(req.collection.as_deref()),
            embed_model: req
                .embed_model
                .clone()
                .unwrap_or_else(|| self.config.llm.embed_model.clone()),
            chunk_size: req.chunk_size.unwrap_or(self.config.chunking.chunk_size),
            overlap: req.overlap.unwrap_or(self.config.chunking.overlap),
            reset: req.reset,
        };
        envelope(self.index.train(corpus_dir, &params).await)
    }

    /// Similarity search.
    pub async fn search(&self, req: &SearchRequest) -> Result<Envelope<SearchReport>> {
        let collection = self.collection_or_default(req.collection.as_deref());
        let embed_model = req
            .embed_model
            .as_deref()
            .unwrap_or(&self.config.llm.embed_model);
        let top_k = req.top_k.unwrap_or(self.config.retrieval.top_k);
        envelope(
            self.retriever
                .search(&req.query, &collection, embed_model, top_k)
                .await,
        )
    }

    /// Retrieval-grounded answer.
    pub async fn answer(&self, req: &AnswerRequest) -> Result<Envelope<AnswerReport>> {
        let collection = self.collection_or_default(req.collection.as_deref());
        let embed_model = req
            .embed_model
            .as_deref()
            .unwrap_or(&self.config.llm.embed_model);
        let chat_model = req
            .chat_model
            .as_deref()
            .unwrap_or(&self.config.llm.chat_model);
        let top_k = req.top_k.unwrap_or(self.config.retrieval.top_k);
        envelope(
            self.synthesizer
                .answer(&req.query, &collection, embed_model, chat_model, top_k)
                .await,
        )
    }

    /// Chunk count of a collection; creates it when absent so a status
    /// read never fails on a fresh name.
    pub fn status(&self, collection: Option<&str>) -> Result<Envelope<StatusReport>> {
        let collection = self.collection_or_default(collection);
        let chunks = self.index.count(&collection)?;
        Ok(Envelope::success(StatusReport { collection, chunks }))
    }

    /// Drop a collection; no-op when it does not exist.
    pub fn reset(&self, collection: Option<&str>) -> Result<Envelope<StatusReport>> {
        let collection = self.collection_or_default(collection);
        self.index.reset(&collection)?;
        Ok(Envelope::success(StatusReport {
            collection,
            chunks: 0,
        }))
    }

    fn collection_or_default(&self, name: Option<&str>) -> String {
        match name {
            Some(n) if !n.trim().is_empty() => n.trim().to_string(),
            _ => self.config.default_collection.clone(),
        }
    }
}
