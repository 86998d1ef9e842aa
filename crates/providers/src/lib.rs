//! Remote collaborator implementations for groundrag.
//!
//! - [`OpenAiCompatProvider`] implements `groundrag_core::Provider` against
//!   any OpenAI-compatible `/v1/chat/completions` endpoint.
//! - [`GroundXClient`] implements `groundrag_core::IndexClient` against the
//!   GroundX REST API.

pub mod groundx;
pub mod openai_compat;

pub use groundx::GroundXClient;
pub use openai_compat::OpenAiCompatProvider;
