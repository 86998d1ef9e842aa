//! IngestionRunner: push documents into the index one at a time.
//!
//! Every document produces exactly one log line, written and flushed
//! before the next document is attempted. The log is therefore always a
//! prefix of the input list, even if the run is killed midway.

use std::fs::File;
use std::io::{LineWriter, Write};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use groundrag_core::error::{Error, Result};
use groundrag_core::index::{BucketId, FileDescriptor, IndexClient};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::documents::Document;

const FILE_TYPE: &str = "txt";

/// Outcome of one ingest attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestRecord {
    /// 1-based position in the input list.
    pub index: usize,
    pub url: String,
    pub title: String,
    /// Index status on success, error text on failure.
    pub status: String,
    pub ok: bool,
}

impl IngestRecord {
    /// `"{i}. {url} [{title}] — {status} (ok|failed)"`, with the title
    /// omitted when empty.
    pub fn log_line(&self) -> String {
        let flag = if self.ok { "ok" } else { "failed" };
        let title = if self.title.is_empty() {
            String::new()
        } else {
            format!(" [{}]", self.title)
        };
        format!("{}. {}{title} — {} ({flag})", self.index, self.url, self.status)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub success: usize,
    pub failed: usize,
}

impl IngestSummary {
    pub fn total(&self) -> usize {
        self.success + self.failed
    }
}

/// File name for a URL: scheme dropped, `/` flattened to `_`, `.txt` added.
pub fn derive_file_name(url: &str) -> String {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    format!("{}.{FILE_TYPE}", stripped.replace('/', "_"))
}

/// Build the descriptor for one document. `url`, `title` and `ingested_at`
/// take precedence over caller metadata with the same key.
pub fn file_descriptor(
    document: &Document,
    extra_metadata: &Map<String, Value>,
    ingested_at: DateTime<Utc>,
) -> FileDescriptor {
    let mut metadata = extra_metadata.clone();
    metadata.insert("url".into(), Value::String(document.url.clone()));
    metadata.insert("title".into(), Value::String(document.title.clone()));
    metadata.insert(
        "ingested_at".into(),
        Value::String(ingested_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );

    FileDescriptor {
        source_url: document.url.clone(),
        file_name: derive_file_name(&document.url),
        file_type: FILE_TYPE.into(),
        metadata,
    }
}

/// Create (or truncate) the ingest log, creating parent directories.
/// Lines reach the file as soon as they are complete.
pub fn open_log(path: &Path) -> std::io::Result<LineWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(LineWriter::new(File::create(path)?))
}

pub struct IngestionRunner {
    index: Arc<dyn IndexClient>,
    bucket: BucketId,
    extra_metadata: Map<String, Value>,
}

impl IngestionRunner {
    pub fn new(index: Arc<dyn IndexClient>, bucket: BucketId) -> Self {
        Self {
            index,
            bucket,
            extra_metadata: Map::new(),
        }
    }

    /// Metadata attached to every document in addition to the defaults.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.extra_metadata = metadata;
        self
    }

    /// Ingest `documents` in order. Per-document failures are recorded and
    /// the run continues; only log or progress write errors abort it.
    pub async fn run<L: Write, P: Write>(
        &self,
        documents: &[Document],
        log: &mut L,
        progress: &mut P,
    ) -> Result<IngestSummary> {
        let total = documents.len();
        let mut summary = IngestSummary::default();
        info!(index = self.index.name(), bucket = %self.bucket, total, "Starting ingestion");

        for (i, document) in documents.iter().enumerate() {
            let record = self.ingest_one(i + 1, document).await;

            if record.ok {
                summary.success += 1;
            } else {
                summary.failed += 1;
            }

            writeln!(log, "{}", record.log_line())?;
            log.flush()?;
            writeln!(progress, "{}/{total} {} — {}", record.index, record.url, record.status)?;
        }

        info!(success = summary.success, failed = summary.failed, "Ingestion finished");
        Ok(summary)
    }

    async fn ingest_one(&self, index: usize, document: &Document) -> IngestRecord {
        let (status, ok) = match self.submit(document).await {
            Ok(status) => (status, true),
            Err(e) => {
                warn!(error = %e, "Document ingest failed");
                (e.to_string(), false)
            }
        };

        IngestRecord {
            index,
            url: document.url.clone(),
            title: document.title.clone(),
            status,
            ok,
        }
    }

    /// Send one document, returning the index's status for it.
    async fn submit(&self, document: &Document) -> Result<String> {
        let descriptor = file_descriptor(document, &self.extra_metadata, Utc::now());
        self.index
            .ingest(self.bucket, &descriptor)
            .await
            .map(|response| response.status)
            .map_err(|e| Error::DocumentIngest {
                url: document.url.clone(),
                reason: e.to_string(),
            })
    }
}
