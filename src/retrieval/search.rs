//! Similarity search over a trained collection

use std::sync::Arc;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::store::{QueryMatch, VectorStore};
use crate::types::SearchReport;

/// Source label used when a match carries no usable metadata.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// One ranked retrieval result.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedItem {
    /// 1-based rank, in the order the store returned matches
    pub rank: usize,
    /// Relevance in [0, 1]; 1 means the vectors coincide
    pub score: f32,
    /// Source file the chunk came from
    pub source: String,
    /// Chunk text
    pub text: String,
}

/// Embeds queries and ranks nearest chunks.
pub struct Retriever {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Retriever {
    /// Create a retriever over a store and an embedder.
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    /// Search a collection for the chunks nearest to `query`.
    ///
    /// A blank query is rejected before any network call; an empty
    /// collection is rejected before the query is embedded, so "no index"
    /// is distinguishable from "no matches". Results keep the store's
    /// ranking order.
    pub async fn search(
        &self,
        query: &str,
        collection_name: &str,
        embed_model: &str,
        top_k: usize,
    ) -> Result<SearchReport> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }

        let collection = self.store.get_or_create(collection_name)?;
        if collection.count()? == 0 {
            return Err(Error::EmptyCollection(collection_name.to_string()));
        }

        let query_embedding = self.embedder.embed(query, embed_model).await?;
        let matches = collection.query(&query_embedding, top_k)?;

        tracing::debug!(
            collection = %collection_name,
            results = matches.len(),
            "search complete"
        );

        let results = matches
            .into_iter()
            .enumerate()
            .map(|(idx, m)| to_retrieved_item(idx, m))
            .collect();

        Ok(SearchReport {
            query: query.to_string(),
            results,
        })
    }
}

/// Map a store match at position `idx` to a ranked item.
fn to_retrieved_item(idx: usize, m: QueryMatch) -> RetrievedItem {
    // Missing distance counts as maximally distant
    let distance = m.distance.unwrap_or(1.0);
    RetrievedItem {
        rank: idx + 1,
        score: score_from_distance(distance),
        source: m.source.unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
        text: m.document,
    }
}

/// Convert cosine distance to a bounded relevance score.
///
/// `max(0, 1 - distance)` rounded to 4 decimals: identical vectors score
/// 1, anything at distance >= 1 clamps to 0 instead of going negative.
pub fn score_from_distance(distance: f32) -> f32 {
    let score = (1.0 - distance).max(0.0);
    (score * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds_and_clamp() {
        assert_eq!(score_from_distance(0.0), 1.0);
        assert_eq!(score_from_distance(1.0), 0.0);
        assert_eq!(score_from_distance(1.5), 0.0);
        assert_eq!(score_from_distance(2.0), 0.0);
        assert_eq!(score_from_distance(0.25), 0.75);
    }

    #[test]
    fn test_score_is_monotone_in_distance() {
        let distances = [0.0, 0.1, 0.35, 0.7, 0.99, 1.0, 1.8];
        for pair in distances.windows(2) {
            assert!(score_from_distance(pair[0]) >= score_from_distance(pair[1]));
        }
    }

    #[test]
    fn test_score_rounding() {
        assert_eq!(score_from_distance(0.33333), 0.6667);
    }

    #[test]
    fn test_missing_distance_and_source_defaults() {
        let item = to_retrieved_item(
            0,
            QueryMatch {
                document: "text".to_string(),
                source: None,
                distance: None,
            },
        );
        assert_eq!(item.rank, 1);
        assert_eq!(item.score, 0.0);
        assert_eq!(item.source, UNKNOWN_SOURCE);
    }
}
