//! Prompt assembly for grounded answers

use crate::providers::ChatMessage;
use crate::retrieval::RetrievedItem;

/// System instruction constraining the model to the retrieved context.
const SYSTEM_INSTRUCTION: &str = "You are a retrieval-grounded assistant. \
Answer only with information supported by the retrieved context. \
If the context does not contain the answer, say so explicitly. \
End with a 'Sources used' block citing [n] and the source name.";

/// Builds the context block and chat messages for answer synthesis.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Assemble retrieved chunks into a labeled context block.
    ///
    /// One section per result in rank order, `[n] Source: <source>` plus
    /// the chunk text, joined with blank lines.
    pub fn build_context(results: &[RetrievedItem]) -> String {
        results
            .iter()
            .map(|item| format!("[{}] Source: {}\n{}", item.rank, item.source, item.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the two-message exchange for the chat collaborator.
    pub fn build_messages(query: &str, results: &[RetrievedItem]) -> Vec<ChatMessage> {
        let context = Self::build_context(results);
        vec![
            ChatMessage::system(SYSTEM_INSTRUCTION),
            ChatMessage::user(format!(
                "Question:\n{}\n\nRetrieved context:\n{}",
                query, context
            )),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(rank: usize, source: &str, text: &str) -> RetrievedItem {
        RetrievedItem {
            rank,
            score: 0.9,
            source: source.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_context_block_format() {
        let results = vec![item(1, "a.txt", "alpha"), item(2, "b.md", "beta")];
        let context = PromptBuilder::build_context(&results);
        assert_eq!(
            context,
            "[1] Source: a.txt\nalpha\n\n[2] Source: b.md\nbeta"
        );
    }

    #[test]
    fn test_messages_shape() {
        let results = vec![item(1, "a.txt", "alpha")];
        let messages = PromptBuilder::build_messages("what is alpha?", &results);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("Sources used"));
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.contains("what is alpha?"));
        assert!(messages[1].content.contains("[1] Source: a.txt"));
    }
}
