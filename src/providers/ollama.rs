//! Ollama HTTP client implementing the embedding and chat provider traits

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::chat::{ChatMessage, ChatProvider};
use super::embedding::EmbeddingProvider;

/// Client for a local Ollama server.
///
/// Serves both provider traits so a single client (and connection pool)
/// backs embeddings and chat.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    embed_timeout: Duration,
    chat_timeout: Duration,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

impl OllamaClient {
    /// Create a client from LLM configuration.
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            embed_timeout: Duration::from_secs(config.embed_timeout_secs),
            chat_timeout: Duration::from_secs(config.chat_timeout_secs),
        }
    }

    /// Check whether the server responds at all.
    pub async fn health_check(&self) -> bool {
        self.client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaClient {
    async fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .timeout(self.embed_timeout)
            .json(&EmbeddingRequest {
                model,
                prompt: text,
            })
            .send()
            .await?
            .error_for_status()?;

        let payload: EmbeddingResponse = response.json().await?;
        if payload.embedding.is_empty() {
            return Err(Error::Provider(format!(
                "model '{}' returned an empty embedding",
                model
            )));
        }
        Ok(payload.embedding)
    }
}

#[async_trait]
impl ChatProvider for OllamaClient {
    async fn complete(&self, messages: &[ChatMessage], model: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .timeout(self.chat_timeout)
            .json(&ChatRequest {
                model,
                messages,
                stream: false,
            })
            .send()
            .await?
            .error_for_status()?;

        let payload: ChatResponse = response.json().await?;
        let content = payload.message.map(|m| m.content).unwrap_or_default();
        Ok(content.trim().to_string())
    }
}
