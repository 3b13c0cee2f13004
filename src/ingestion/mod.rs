//! Corpus ingestion: normalization, chunking, and chunk identity

mod chunker;
mod corpus;
mod normalize;

pub use chunker::{chunk_id, chunk_text};
pub use corpus::{load_corpus_chunks, ChunkRecord};
pub use normalize::{normalize, SourceFormat};
