//! Grounded answer generation

mod answer;
mod prompt;

pub use answer::AnswerSynthesizer;
pub use prompt::PromptBuilder;
