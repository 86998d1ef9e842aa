//! ChatSession: the interactive query/answer loop.
//!
//! One line in, one turn out:
//! 1. Parse the line into a [`SessionCommand`]
//! 2. For a query: search the bucket, assemble context, build the turn
//! 3. Call the provider once
//! 4. Render the answer followed by its citations
//!
//! Search and answer failures are reported on the output and the loop
//! keeps going. Only end of input, an interrupt, or `/exit` ends it.

use std::io::Write;
use std::sync::Arc;

use groundrag_channels::{InputLine, SessionCommand};
use groundrag_config::RagConfig;
use groundrag_core::error::{AnswerFailure, ChannelError, Result};
use groundrag_core::index::{BucketId, IndexClient};
use groundrag_core::provider::Provider;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::context::{truncate_with_marker, ContextAssembler, Source};
use crate::prompt::PromptBuilder;

pub const PROMPT: &str = "rag> ";

const RAW_TRUNCATION_MARKER: &str = "\n...[TRUNCATED]";

const HELP_TEXT: &str = "Commands:
  /help   Show this help
  /raw    Show the context retrieved for the previous question
  /exit   Leave the session (also /quit, Ctrl+D, Ctrl+C)

Anything else is sent as a question. Answers are grounded in the ingested
documents and end with the list of sources used.";

const EMPTY_CONTEXT_CAVEAT: &str = "No context was retrieved for that query. \
I'll still try to answer, but I may be less precise.";

const ANSWER_FAILURE_HINT: &str = "You can try reducing context size or checking your \
OPENAI_MODEL_NAME and OPENAI_API_BASE.";

/// Where the session is in handling the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    ParsingCommand,
    Searching,
    Assembling,
    Prompting,
    Answering,
    Rendering,
    Exited,
}

pub struct ChatSession {
    index: Arc<dyn IndexClient>,
    provider: Arc<dyn Provider>,
    bucket: BucketId,
    assembler: ContextAssembler,
    prompts: PromptBuilder,
    top_k: usize,
    raw_display_chars: usize,
    state: SessionState,
    /// Context text of the most recent query, for `/raw`.
    last_context: Option<String>,
}

impl ChatSession {
    pub fn new(
        index: Arc<dyn IndexClient>,
        provider: Arc<dyn Provider>,
        bucket: BucketId,
        rag: &RagConfig,
    ) -> Self {
        Self {
            index,
            provider,
            bucket,
            assembler: ContextAssembler::from_config(rag),
            prompts: PromptBuilder::from_config(rag),
            top_k: rag.top_k,
            raw_display_chars: rag.raw_display_chars,
            state: SessionState::AwaitingInput,
            last_context: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn last_context(&self) -> Option<&str> {
        self.last_context.as_deref()
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "Session state change");
        self.state = next;
    }

    /// Read lines until `/exit`, end of input, or an interrupt.
    ///
    /// Only output write errors abort the loop.
    pub async fn run<W: Write>(
        &mut self,
        input: &mut mpsc::Receiver<InputLine>,
        out: &mut W,
    ) -> Result<()> {
        info!(bucket = %self.bucket, model = self.provider.model(), "Chat session started");
        writeln!(out, "Type a question, or /help for commands.")?;

        while self.state != SessionState::Exited {
            write!(out, "\n{PROMPT}")?;
            out.flush()?;

            match input.recv().await {
                Some(Ok(line)) => self.handle_line(&line, out).await?,
                Some(Err(ChannelError::Interrupted)) | None => {
                    writeln!(out, "\nExiting.")?;
                    self.transition(SessionState::Exited);
                }
                Some(Err(e)) => {
                    warn!(error = %e, "Input channel failed");
                    writeln!(out, "\nInput closed ({e}). Exiting.")?;
                    self.transition(SessionState::Exited);
                }
            }
        }

        info!("Chat session ended");
        Ok(())
    }

    /// Handle one raw input line. Leaves the session in `AwaitingInput`,
    /// or `Exited` after an exit command.
    pub async fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<()> {
        self.transition(SessionState::ParsingCommand);

        match SessionCommand::parse(line) {
            None => {}
            Some(SessionCommand::Exit) => {
                writeln!(out, "Bye.")?;
                self.transition(SessionState::Exited);
                return Ok(());
            }
            Some(SessionCommand::Help) => writeln!(out, "{HELP_TEXT}")?,
            Some(SessionCommand::Raw) => self.show_raw(out)?,
            Some(SessionCommand::Query(question)) => self.answer(&question, out).await?,
        }

        self.transition(SessionState::AwaitingInput);
        Ok(())
    }

    fn show_raw<W: Write>(&self, out: &mut W) -> Result<()> {
        match &self.last_context {
            None => writeln!(
                out,
                "No context has been retrieved yet. Ask a question first, then use /raw."
            )?,
            Some(context) if context.is_empty() => {
                writeln!(out, "The previous query retrieved no context.")?
            }
            Some(context) => {
                let (shown, _) =
                    truncate_with_marker(context, self.raw_display_chars, RAW_TRUNCATION_MARKER);
                writeln!(out, "\n--- RAW CONTEXT ---\n{shown}\n--- END RAW CONTEXT ---")?;
            }
        }
        Ok(())
    }

    async fn answer<W: Write>(&mut self, question: &str, out: &mut W) -> Result<()> {
        self.last_context = None;

        self.transition(SessionState::Searching);
        let response = match self.index.search(self.bucket, question).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Search failed");
                writeln!(out, "Search error: {e}")?;
                return Ok(());
            }
        };

        self.transition(SessionState::Assembling);
        let context = self.assembler.assemble(&response, self.top_k);
        debug!(
            results = response.results.len(),
            chars = context.text.chars().count(),
            truncated = context.truncated,
            "Context assembled"
        );
        self.last_context = Some(context.text.clone());

        if context.text.is_empty() {
            writeln!(out, "{EMPTY_CONTEXT_CAVEAT}")?;
        }

        self.transition(SessionState::Prompting);
        let turn = self.prompts.build_turn(&context.text, question);
        writeln!(
            out,
            "[1/2] Retrieved context length: {} chars",
            context.text.chars().count()
        )?;
        writeln!(out, "[2/2] Sending to LLM... (this may take a few seconds)")?;
        out.flush()?;

        self.transition(SessionState::Answering);
        let answer = match self.provider.complete(&turn).await {
            Ok(answer) => answer,
            Err(failure) => {
                warn!(kind = failure.kind(), provider = self.provider.name(), "Answer failed");
                writeln!(
                    out,
                    "\nLLM call failed ({}). Debug info:\n{}\n\n{ANSWER_FAILURE_HINT}",
                    failure.kind(),
                    describe_failure(&failure)
                )?;
                return Ok(());
            }
        };

        self.transition(SessionState::Rendering);
        writeln!(out, "\n--- Answer ---\n\n{}\n\n--- End Answer ---", answer.trim())?;
        render_sources(out, &context.sources)?;
        Ok(())
    }
}

/// Diagnostic detail for an answer failure, one field per line.
pub fn describe_failure(failure: &AnswerFailure) -> String {
    match failure {
        AnswerFailure::Transport { detail } => format!("error: {detail}"),
        AnswerFailure::Upstream { status_code, body } => {
            format!("status_code: {status_code}\nresponse_text: {body}")
        }
        AnswerFailure::MalformedResponse { raw_body } => {
            format!("error: unexpected JSON shape\nresponse_text: {raw_body}")
        }
    }
}

/// Render the ordered citation list.
pub fn render_sources<W: Write>(out: &mut W, sources: &[Source]) -> std::io::Result<()> {
    if sources.is_empty() {
        return writeln!(out, "\n(Sources: none returned)\n");
    }
    writeln!(out, "\nSources used:")?;
    for (i, source) in sources.iter().enumerate() {
        writeln!(
            out,
            " [{}] {} — {} (score={})",
            i + 1,
            source.display_title(),
            source.display_url(),
            source.score
        )?;
    }
    Ok(())
}
