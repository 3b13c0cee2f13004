//! corpus-rag: retrieval-augmented question answering over a local corpus
//!
//! Ingests a directory of text/markdown/HTML files into overlapping,
//! content-addressed chunks, indexes them in SQLite-backed cosine
//! collections, and answers queries with an Ollama chat model grounded in
//! the retrieved context.

pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod index;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod store;
pub mod types;

pub use config::RagConfig;
pub use engine::{AnswerRequest, RagEngine, SearchRequest, TrainRequest};
pub use error::{Error, Result};
pub use ingestion::ChunkRecord;
pub use retrieval::RetrievedItem;
