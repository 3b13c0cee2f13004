//! Chat provider trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One message in a chat exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user" or "assistant"
    pub role: String,
    /// Message body
    pub content: String,
}

impl ChatMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Trait for non-streaming chat completion.
///
/// Implementations:
/// - `OllamaClient`: local Ollama server
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a message list and return the model's reply text.
    async fn complete(&self, messages: &[ChatMessage], model: &str) -> Result<String>;
}
