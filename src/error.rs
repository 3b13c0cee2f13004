//! Error types for the RAG pipeline

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the RAG pipeline.
///
/// The first three variants are rejections: conditions detected locally
/// (bad input or an empty index/corpus) that become `ok:false` envelopes
/// rather than faults. Everything else is a collaborator or I/O failure
/// and propagates to the caller as-is.
#[derive(Debug, Error)]
pub enum Error {
    /// Query was blank after trimming
    #[error("query is empty")]
    EmptyQuery,

    /// Target collection has no indexed chunks
    #[error("collection '{0}' is empty; train a corpus first")]
    EmptyCollection(String),

    /// Corpus directory produced no usable chunk records
    #[error("no valid documents found in the corpus (.txt/.md/.html/.htm)")]
    EmptyCorpus,

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Embedding or chat collaborator failure
    #[error("provider error: {0}")]
    Provider(String),

    /// HTTP transport failure talking to a collaborator
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Vector store failure
    #[error("vector store error: {0}")]
    VectorDb(String),

    /// Filesystem failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for structured failures that turn into `ok:false` envelopes
    /// instead of propagating as faults.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::EmptyQuery | Error::EmptyCollection(_) | Error::EmptyCorpus
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::VectorDb(e.to_string())
    }
}
