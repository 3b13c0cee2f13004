//! End-to-end pipeline tests with stub providers and an in-memory store

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tempfile::TempDir;

use corpus_rag::config::RagConfig;
use corpus_rag::engine::{AnswerRequest, RagEngine, SearchRequest, TrainRequest};
use corpus_rag::error::Result;
use corpus_rag::providers::{ChatMessage, ChatProvider, EmbeddingProvider};
use corpus_rag::store::{SqliteVectorStore, VectorStore};

/// Deterministic embedder: counts keyword occurrences, no network.
struct StubEmbedder {
    calls: AtomicUsize,
}

impl StubEmbedder {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str, _model: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let lower = text.to_lowercase();
        let count = |word: &str| lower.matches(word).count() as f32;
        // Constant first component keeps the vector off zero
        Ok(vec![
            0.1,
            count("alpha"),
            count("beta"),
            count("gamma"),
            count("delta"),
        ])
    }
}

/// Canned chat provider that records what it was asked.
struct StubChat {
    received: Mutex<Vec<Vec<ChatMessage>>>,
    reply: String,
}

impl StubChat {
    fn new(reply: &str) -> Self {
        Self {
            received: Mutex::new(Vec::new()),
            reply: reply.to_string(),
        }
    }

    fn call_count(&self) -> usize {
        self.received.lock().len()
    }

    fn last_messages(&self) -> Vec<ChatMessage> {
        self.received.lock().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ChatProvider for StubChat {
    async fn complete(&self, messages: &[ChatMessage], _model: &str) -> Result<String> {
        self.received.lock().push(messages.to_vec());
        Ok(self.reply.clone())
    }
}

struct Harness {
    engine: RagEngine,
    embedder: Arc<StubEmbedder>,
    chat: Arc<StubChat>,
    corpus: TempDir,
}

fn harness() -> Harness {
    let corpus = TempDir::new().unwrap();
    let mut config = RagConfig::default();
    config.corpus_dir = corpus.path().to_path_buf();
    config.default_collection = "test_collection".to_string();

    let store: Arc<dyn VectorStore> = Arc::new(SqliteVectorStore::in_memory().unwrap());
    let embedder = Arc::new(StubEmbedder::new());
    let chat = Arc::new(StubChat::new(
        "Alpha is the first concept. Sources used: [1] a.txt",
    ));

    let engine = RagEngine::with_providers(config, store, embedder.clone(), chat.clone());
    Harness {
        engine,
        embedder,
        chat,
        corpus,
    }
}

fn write_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[tokio::test]
async fn train_then_search_end_to_end() {
    let h = harness();
    write_file(h.corpus.path(), "a.txt", "alpha beta gamma");

    let train = h
        .engine
        .train(&TrainRequest {
            chunk_size: Some(10),
            overlap: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(train.ok);
    let report = train.payload.unwrap();
    assert_eq!(report.chunks, 2);
    assert_eq!(report.documents, 1);
    assert_eq!(report.collection, "test_collection");

    let search = h
        .engine
        .search(&SearchRequest {
            query: "alpha".to_string(),
            top_k: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(search.ok);
    let report = search.payload.unwrap();
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].rank, 1);
    assert_eq!(report.results[0].source, "a.txt");
    assert!(report.results[0].score >= 0.0 && report.results[0].score <= 1.0);
}

#[tokio::test]
async fn search_ranks_by_similarity() {
    let h = harness();
    write_file(h.corpus.path(), "alpha.txt", "alpha alpha alpha");
    write_file(h.corpus.path(), "beta.txt", "beta beta beta");

    h.engine.train(&TrainRequest::default()).await.unwrap();

    let search = h
        .engine
        .search(&SearchRequest {
            query: "alpha".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let report = search.payload.unwrap();
    assert_eq!(report.results[0].source, "alpha.txt");
    assert!(report.results[0].score > report.results[1].score);
    // Ranks follow store order
    let ranks: Vec<usize> = report.results.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2]);
}

#[tokio::test]
async fn blank_query_rejected_before_any_embedding_call() {
    let h = harness();
    write_file(h.corpus.path(), "a.txt", "alpha beta gamma");
    h.engine.train(&TrainRequest::default()).await.unwrap();
    let calls_after_train = h.embedder.call_count();

    let search = h
        .engine
        .search(&SearchRequest {
            query: "   \t  ".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(!search.ok);
    assert_eq!(search.error.unwrap(), "query is empty");
    assert_eq!(h.embedder.call_count(), calls_after_train);
}

#[tokio::test]
async fn search_on_untrained_collection_is_a_structured_failure() {
    let h = harness();
    let search = h
        .engine
        .search(&SearchRequest {
            query: "anything".to_string(),
            collection: Some("never_trained".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(!search.ok);
    assert!(search.error.unwrap().contains("empty"));
    assert_eq!(h.embedder.call_count(), 0);
}

#[tokio::test]
async fn train_on_empty_corpus_is_a_structured_failure() {
    let h = harness();

    let train = h.engine.train(&TrainRequest::default()).await.unwrap();
    assert!(!train.ok);
    assert!(train.error.unwrap().contains("no valid documents"));
    assert_eq!(h.embedder.call_count(), 0);
}

#[tokio::test]
async fn retrain_with_reset_replaces_prior_content() {
    let h = harness();
    write_file(h.corpus.path(), "a.txt", "alpha beta gamma delta epsilon");
    write_file(h.corpus.path(), "b.txt", "more alpha content here");
    h.engine.train(&TrainRequest::default()).await.unwrap();

    // Shrink the corpus and retrain with reset
    fs::remove_file(h.corpus.path().join("b.txt")).unwrap();
    write_file(h.corpus.path(), "a.txt", "gamma only");
    let train = h.engine.train(&TrainRequest::default()).await.unwrap();
    let chunks = train.payload.unwrap().chunks;

    let status = h.engine.status(None).unwrap();
    assert_eq!(status.payload.unwrap().chunks, chunks);
}

#[tokio::test]
async fn retrain_without_reset_upserts_by_chunk_id() {
    let h = harness();
    write_file(h.corpus.path(), "a.txt", "alpha beta gamma");

    h.engine.train(&TrainRequest::default()).await.unwrap();
    let first = h.engine.status(None).unwrap().payload.unwrap().chunks;

    // Same corpus, same ids: count must not grow
    h.engine
        .train(&TrainRequest {
            reset: false,
            ..Default::default()
        })
        .await
        .unwrap();
    let second = h.engine.status(None).unwrap().payload.unwrap().chunks;
    assert_eq!(first, second);
}

#[tokio::test]
async fn status_on_fresh_collection_is_zero_not_an_error() {
    let h = harness();
    let status = h.engine.status(Some("brand_new")).unwrap();
    assert!(status.ok);
    assert_eq!(status.payload.unwrap().chunks, 0);
}

#[tokio::test]
async fn reset_then_status_reports_empty() {
    let h = harness();
    write_file(h.corpus.path(), "a.txt", "alpha beta gamma");
    h.engine.train(&TrainRequest::default()).await.unwrap();

    let reset = h.engine.reset(None).unwrap();
    assert!(reset.ok);
    assert_eq!(h.engine.status(None).unwrap().payload.unwrap().chunks, 0);
}

#[tokio::test]
async fn answer_grounds_the_chat_call_in_retrieved_context() {
    let h = harness();
    write_file(h.corpus.path(), "a.txt", "alpha beta gamma");
    h.engine.train(&TrainRequest::default()).await.unwrap();

    let answer = h
        .engine
        .answer(&AnswerRequest {
            query: "what is alpha?".to_string(),
            top_k: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(answer.ok);
    let report = answer.payload.unwrap();
    assert!(report.answer.starts_with("Alpha is the first concept"));
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.embed_model, "nomic-embed-text");
    assert_eq!(report.chat_model, "qwen2.5-coder:7b");

    let messages = h.chat.last_messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, "system");
    assert!(messages[1].content.contains("[1] Source: a.txt"));
    assert!(messages[1].content.contains("what is alpha?"));
}

#[tokio::test]
async fn answer_propagates_retrieval_failures_without_calling_chat() {
    let h = harness();

    let answer = h
        .engine
        .answer(&AnswerRequest {
            query: "  ".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(!answer.ok);
    assert_eq!(answer.error.unwrap(), "query is empty");
    assert_eq!(h.chat.call_count(), 0);
}
