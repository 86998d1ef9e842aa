//! # groundrag pipeline
//!
//! The retrieval-to-answer path and the batch ingestion loop.
//!
//! ```text
//! query ──► IndexClient::search ──► ContextAssembler ──► PromptBuilder ──► Provider
//!                                          │                                  │
//!                                          └────────── sources ──────► rendered answer
//! ```
//!
//! - [`ChatSession`]: interactive loop over a line channel
//! - [`IngestionRunner`]: sequential ingest with a per-document log
//! - [`resolve_bucket`]: find-or-create the bucket both of them use

pub mod bucket;
pub mod context;
pub mod documents;
pub mod ingest;
pub mod prompt;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use bucket::resolve_bucket;
pub use context::{
    AssembledContext, ContextAssembler, Source, RESULTS_TRUNCATION_MARKER, TRUNCATION_MARKER,
};
pub use documents::{load_documents, Document, DocumentLoadError};
pub use ingest::{derive_file_name, open_log, IngestRecord, IngestSummary, IngestionRunner};
pub use prompt::PromptBuilder;
pub use session::{ChatSession, SessionState};
