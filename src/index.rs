//! Index manager: collection lifecycle and corpus training

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::ingestion::load_corpus_chunks;
use crate::providers::EmbeddingProvider;
use crate::store::{Collection, VectorStore};
use crate::types::TrainReport;

/// Parameters for one train run.
#[derive(Debug, Clone)]
pub struct TrainParams {
    /// Target collection name
    pub collection: String,
    /// Embedding model to use
    pub embed_model: String,
    /// Chunk window size in characters
    pub chunk_size: usize,
    /// Overlap between windows in characters
    pub overlap: usize,
    /// Delete the prior collection before indexing
    pub reset: bool,
}

/// Owns named collections in the vector store and runs training.
pub struct IndexManager {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl IndexManager {
    /// Create an index manager over a store and an embedder.
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    /// Return the named collection, creating it if absent. Idempotent.
    pub fn get_or_create(&self, name: &str) -> Result<Box<dyn Collection>> {
        self.store.get_or_create(name)
    }

    /// Delete the named collection; no-op when it does not exist.
    pub fn reset(&self, name: &str) -> Result<()> {
        self.store.delete(name)
    }

    /// Current chunk count of the named collection. Creates the collection
    /// when absent, so a status read never fails on a fresh name.
    pub fn count(&self, name: &str) -> Result<usize> {
        self.get_or_create(name)?.count()
    }

    /// Ingest a corpus directory into a collection.
    ///
    /// Loads and chunks the corpus first; an empty corpus is rejected
    /// before anything is deleted or embedded. With `reset` the prior
    /// collection is dropped so stale ids from removed or changed files
    /// do not linger; without it, overlapping chunk ids are upserts.
    /// Embeddings are computed sequentially in record order, then added
    /// to the store in one batch.
    pub async fn train<P: AsRef<Path>>(
        &self,
        corpus_dir: P,
        params: &TrainParams,
    ) -> Result<TrainReport> {
        let records = load_corpus_chunks(&corpus_dir, params.chunk_size, params.overlap)?;
        if records.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        tracing::info!(
            collection = %params.collection,
            chunks = records.len(),
            "training collection from {}",
            corpus_dir.as_ref().display()
        );

        if params.reset {
            self.reset(&params.collection)?;
        }

        let collection = self.get_or_create(&params.collection)?;

        let ids: Vec<String> = records.iter().map(|r| r.chunk_id.clone()).collect();
        let documents: Vec<String> = records.iter().map(|r| r.text.clone()).collect();
        let sources: Vec<String> = records.iter().map(|r| r.source.clone()).collect();

        let embeddings = self
            .embedder
            .embed_batch(&documents, &params.embed_model)
            .await?;

        collection.add(&ids, &documents, &sources, &embeddings)?;

        let distinct_sources: HashSet<&str> = sources.iter().map(String::as_str).collect();

        tracing::info!(
            collection = %params.collection,
            documents = distinct_sources.len(),
            chunks = ids.len(),
            "training complete"
        );

        Ok(TrainReport {
            collection: params.collection.clone(),
            documents: distinct_sources.len(),
            chunks: ids.len(),
            embed_model: params.embed_model.clone(),
        })
    }
}
