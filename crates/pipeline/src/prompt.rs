//! Turn construction for the chat model.
//!
//! The system message carries fixed answering rules followed by the
//! retrieved context between `===` delimiters. The user message is the
//! question with a fixed reminder appended.

use groundrag_config::RagConfig;
use groundrag_core::message::Turn;

use crate::context::{truncate_with_marker, TRUNCATION_MARKER};

pub const SYSTEM_INSTRUCTIONS: &str = "You are a highly knowledgeable assistant. \
Your primary role is to answer user questions using the provided document context.\n\
- If the context contains the answer, respond concisely and include a short 'Sources:' section listing titles and URLs used.\n\
- If the context does not contain the answer, say \"I don't know\" and avoid hallucinating.\n\
- Be technical, precise, and concise for a developer audience.\n";

pub const CONTEXT_DELIMITER: &str = "\n===\n";

pub const USER_SUFFIX: &str = "\n\nPlease answer using only the provided document context. \
At the end, include a short 'Sources:' list.";

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    max_system_chars: usize,
}

impl PromptBuilder {
    pub fn new(max_system_chars: usize) -> Self {
        Self { max_system_chars }
    }

    pub fn from_config(config: &RagConfig) -> Self {
        Self::new(config.max_system_chars)
    }

    /// Instructions plus delimited context. A message longer than the system
    /// budget is cut as a whole and ends with the truncation marker.
    pub fn build_system_message(&self, context: &str) -> String {
        let full = format!("{SYSTEM_INSTRUCTIONS}{CONTEXT_DELIMITER}{context}{CONTEXT_DELIMITER}");
        let (message, _) = truncate_with_marker(&full, self.max_system_chars, TRUNCATION_MARKER);
        message
    }

    pub fn build_user_message(&self, question: &str) -> String {
        format!("{question}{USER_SUFFIX}")
    }

    pub fn build_turn(&self, context: &str, question: &str) -> Turn {
        Turn::new(
            self.build_system_message(context),
            self.build_user_message(question),
        )
    }
}
