//! Query-time retrieval: embedding, similarity search, and scoring

mod search;

pub use search::{score_from_distance, RetrievedItem, Retriever, UNKNOWN_SOURCE};
