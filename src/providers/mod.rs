//! Collaborator seams: embedding and chat providers
//!
//! The pipeline only ever talks to its model backends through these traits,
//! so the deterministic parts (chunking, ids, scoring) are testable with
//! stub providers and no network.

pub mod chat;
pub mod embedding;
pub mod ollama;

pub use chat::{ChatMessage, ChatProvider};
pub use embedding::EmbeddingProvider;
pub use ollama::OllamaClient;
