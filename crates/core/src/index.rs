//! IndexClient trait: the abstraction over the hosted retrieval index.
//!
//! The index owns everything about storage and ranking. groundrag only
//! calls four operations on it and interprets the responses through the
//! vendor-neutral types defined here; vendor response shapes stay inside
//! the adapter that implements the trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::IndexError;

/// Identifier of a bucket inside the index service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketId(pub u64);

impl std::fmt::Display for BucketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named collection that scopes search and ingest calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub id: BucketId,
    pub name: String,
}

/// One ranked hit returned by the index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub score: f64,

    #[serde(default)]
    pub text: String,

    /// Index-suggested excerpt, preferred over `text` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_text: Option<String>,

    /// Metadata attached at ingest time (`url`, `title`, `ingested_at`, ...).
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl SearchResult {
    /// `metadata.title`, if it is a string.
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(|v| v.as_str())
    }

    /// `metadata.url`, if it is a string.
    pub fn source_url(&self) -> Option<&str> {
        self.metadata.get("url").and_then(|v| v.as_str())
    }
}

/// The full answer to a search call, in index ranking order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Single concatenated relevance text, when the index provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// Describes a remote document the index should fetch and store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// URL the index service fetches the content from.
    pub source_url: String,
    pub file_name: String,
    /// Declared content type, e.g. `txt`.
    pub file_type: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Acknowledgement of an ingest request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<String>,
}

#[async_trait]
pub trait IndexClient: Send + Sync {
    /// A human-readable name for this index (e.g., "groundx").
    fn name(&self) -> &str;

    /// Query a bucket. Results come back relevance-descending.
    async fn search(
        &self,
        bucket: BucketId,
        query: &str,
    ) -> std::result::Result<SearchResponse, IndexError>;

    /// Ask the index to fetch and store one document.
    async fn ingest(
        &self,
        bucket: BucketId,
        file: &FileDescriptor,
    ) -> std::result::Result<IngestResponse, IndexError>;

    async fn list_buckets(&self) -> std::result::Result<Vec<Bucket>, IndexError>;

    async fn create_bucket(&self, name: &str) -> std::result::Result<Bucket, IndexError>;
}
