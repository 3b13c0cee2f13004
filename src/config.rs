//! Configuration for the RAG pipeline

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main RAG configuration
///
/// Everything the pipeline needs is carried here explicitly; there is no
/// ambient global state. Defaults match a single-operator local deployment
/// with Ollama on the loopback interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    /// Ollama/LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Vector store configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Corpus directory to ingest at train time
    #[serde(default = "default_corpus_dir")]
    pub corpus_dir: PathBuf,
    /// Default collection name
    #[serde(default = "default_collection")]
    pub default_collection: String,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            storage: StorageConfig::default(),
            corpus_dir: default_corpus_dir(),
            default_collection: default_collection(),
        }
    }
}

impl RagConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&raw).map_err(|e| Error::Config(e.to_string()))
    }
}

fn default_corpus_dir() -> PathBuf {
    PathBuf::from("corpus")
}

fn default_collection() -> String {
    "corpus_rag".to_string()
}

/// Ollama endpoint and model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Chat model name
    pub chat_model: String,
    /// Timeout for a single embedding request, in seconds
    pub embed_timeout_secs: u64,
    /// Timeout for a single chat request, in seconds
    pub chat_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            chat_model: "qwen2.5-coder:7b".to_string(),
            embed_timeout_secs: 60,
            chat_timeout_secs: 120,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive windows, in characters
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 700,
            overlap: 120,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks to retrieve per query
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

/// Vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the SQLite database holding the collections
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("corpus-rag")
            .join("collections.db");
        Self { db_path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RagConfig::default();
        assert_eq!(config.chunking.chunk_size, 700);
        assert_eq!(config.chunking.overlap, 120);
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.llm.embed_model, "nomic-embed-text");
        assert_eq!(config.default_collection, "corpus_rag");
    }

    #[test]
    fn test_partial_toml_overlays_defaults() {
        let config: RagConfig = toml::from_str(
            r#"
            default_collection = "notes"

            [chunking]
            chunk_size = 200
            overlap = 40
            "#,
        )
        .unwrap();

        assert_eq!(config.default_collection, "notes");
        assert_eq!(config.chunking.chunk_size, 200);
        assert_eq!(config.llm.chat_model, "qwen2.5-coder:7b");
    }
}
