//! Vector store collaborator interface
//!
//! A store owns named collections of (id, document, source, embedding)
//! rows. The similarity metric is fixed to cosine; ids are unique within a
//! collection and adds with a known id replace the prior row.

mod sqlite;

pub use sqlite::SqliteVectorStore;

use crate::error::Result;

/// One nearest-neighbor match returned by a collection query.
#[derive(Debug, Clone)]
pub struct QueryMatch {
    /// Stored document text
    pub document: String,
    /// Source metadata, if present
    pub source: Option<String>,
    /// Cosine distance to the query vector; `None` when the distance
    /// could not be computed (dimension mismatch, zero vector)
    pub distance: Option<f32>,
}

/// A named collection of embedded chunks.
pub trait Collection: Send + Sync {
    /// Add rows in bulk. Parallel slices must have equal length; an
    /// existing id replaces its prior row (upsert).
    fn add(
        &self,
        ids: &[String],
        documents: &[String],
        sources: &[String],
        embeddings: &[Vec<f32>],
    ) -> Result<()>;

    /// Nearest-neighbor query, best match first.
    fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<QueryMatch>>;

    /// Number of rows in the collection.
    fn count(&self) -> Result<usize>;
}

/// Collection lifecycle operations.
pub trait VectorStore: Send + Sync {
    /// Return the named collection, creating it (cosine metric) if absent.
    fn get_or_create(&self, name: &str) -> Result<Box<dyn Collection>>;

    /// Delete the named collection and its rows; no-op when missing.
    fn delete(&self, name: &str) -> Result<()>;

    /// Names of all existing collections.
    fn list(&self) -> Result<Vec<String>>;
}
