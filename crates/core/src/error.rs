//! Error types for the groundrag domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each external collaborator has its own error type; the top-level
//! [`Error`] carries the taxonomy the CLI reports on.

use thiserror::Error;

/// The top-level error type for all groundrag operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Fatal before any loop starts ---
    #[error("Missing required configuration: {}", .vars.join(", "))]
    ConfigurationMissing { vars: Vec<String> },

    #[error("Failed to resolve bucket '{bucket}': {reason}")]
    BucketResolution { bucket: String, reason: String },

    // --- Recoverable, reported per document ---
    #[error("Ingest failed for {url}: {reason}")]
    DocumentIngest { url: String, reason: String },

    // --- Plumbing ---
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the retrieval index collaborator.
#[derive(Debug, Clone, Error)]
pub enum IndexError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Index API request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Unexpected index response: {0}")]
    MalformedResponse(String),
}

/// How a single chat-completion call failed.
///
/// Every variant carries enough of the upstream exchange to diagnose the
/// problem without re-running the request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnswerFailure {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("HTTP exception when calling chat endpoint: {detail}")]
    Transport { detail: String },

    /// The endpoint answered with a non-2xx status.
    #[error("chat endpoint returned status {status_code}: {body}")]
    Upstream { status_code: u16, body: String },

    /// 2xx, but the body did not have the `choices[0].message.content` shape.
    #[error("unexpected JSON shape: {raw_body}")]
    MalformedResponse { raw_body: String },
}

impl AnswerFailure {
    /// Short machine-friendly label for the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Upstream { .. } => "upstream_error",
            Self::MalformedResponse { .. } => "malformed_response",
        }
    }
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel connection lost: {0}")]
    ConnectionLost(String),

    #[error("Interrupted")]
    Interrupted,
}
