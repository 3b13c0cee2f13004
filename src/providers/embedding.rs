//! Embedding provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for turning text into embedding vectors.
///
/// Implementations:
/// - `OllamaClient`: local Ollama server (nomic-embed-text or similar)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, order-preserving.
    ///
    /// Default implementation calls `embed` sequentially, one text at a
    /// time, in list order.
    async fn embed_batch(&self, texts: &[String], model: &str) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text, model).await?);
        }
        Ok(embeddings)
    }
}
