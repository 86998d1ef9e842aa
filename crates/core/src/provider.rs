//! Provider trait: the abstraction over the chat-completion backend.
//!
//! A Provider sends one [`Turn`] to an LLM and returns the answer text.
//! Failures are classified into [`AnswerFailure`] so the interactive layer
//! can report them uniformly. Providers never retry.

use async_trait::async_trait;

use crate::error::AnswerFailure;
use crate::message::Turn;

#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai-compat").
    fn name(&self) -> &str;

    /// The model requests are sent to.
    fn model(&self) -> &str;

    /// Send one turn and get the answer text back.
    async fn complete(&self, turn: &Turn) -> std::result::Result<String, AnswerFailure>;
}
