//! Answer synthesis: retrieval plus one grounded chat call

use std::sync::Arc;

use crate::error::Result;
use crate::providers::ChatProvider;
use crate::retrieval::Retriever;
use crate::types::AnswerReport;

use super::prompt::PromptBuilder;

/// Turns a query into a grounded answer with cited sources.
pub struct AnswerSynthesizer {
    retriever: Retriever,
    chat: Arc<dyn ChatProvider>,
}

impl AnswerSynthesizer {
    /// Create a synthesizer over a retriever and a chat provider.
    pub fn new(retriever: Retriever, chat: Arc<dyn ChatProvider>) -> Self {
        Self { retriever, chat }
    }

    /// Retrieve context for `query` and ask the chat model for a grounded
    /// answer. Retrieval failures propagate unchanged; the chat call is
    /// made once, non-streaming, no retries.
    pub async fn answer(
        &self,
        query: &str,
        collection_name: &str,
        embed_model: &str,
        chat_model: &str,
        top_k: usize,
    ) -> Result<AnswerReport> {
        let search = self
            .retriever
            .search(query, collection_name, embed_model, top_k)
            .await?;

        let messages = PromptBuilder::build_messages(&search.query, &search.results);
        let answer = self.chat.complete(&messages, chat_model).await?;

        tracing::info!(
            collection = %collection_name,
            sources = search.results.len(),
            "answer generated"
        );

        Ok(AnswerReport {
            query: search.query,
            answer: answer.trim().to_string(),
            results: search.results,
            chat_model: chat_model.to_string(),
            embed_model: embed_model.to_string(),
        })
    }
}
