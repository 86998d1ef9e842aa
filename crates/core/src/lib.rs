//! # groundrag core
//!
//! Domain types, collaborator traits, and error definitions for the
//! groundrag retrieval-to-answer pipeline. This crate has **no I/O**; it
//! defines the model that the provider, channel, and pipeline crates
//! implement against.
//!
//! ## Collaborators
//!
//! Two external services are modelled as traits here:
//! - [`IndexClient`]: the hosted retrieval index (search, ingest, buckets)
//! - [`Provider`]: an OpenAI-compatible chat-completion endpoint
//!
//! Implementations live in `groundrag-providers`; tests substitute scripted
//! fakes.

pub mod error;
pub mod index;
pub mod message;
pub mod provider;

pub use error::{AnswerFailure, ChannelError, Error, IndexError, Result};
pub use index::{
    Bucket, BucketId, FileDescriptor, IndexClient, IngestResponse, SearchResponse, SearchResult,
};
pub use message::{Message, Role, Turn};
pub use provider::Provider;
