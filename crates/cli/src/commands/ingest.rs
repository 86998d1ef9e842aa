//! `groundrag ingest`: push the document list into the bucket.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use groundrag_pipeline::{load_documents, open_log, resolve_bucket, IngestionRunner};
use groundrag_providers::GroundXClient;
use tracing::info;

use super::{load_config, CommandResult};

pub async fn run(
    config_path: &Path,
    documents: Option<PathBuf>,
    log: Option<PathBuf>,
) -> CommandResult {
    let config = load_config(config_path)?;
    let documents_path = documents.unwrap_or_else(|| config.paths.documents_path.clone());
    let log_path = log.unwrap_or_else(|| config.paths.log_path.clone());

    let documents = match load_documents(&documents_path) {
        Ok(docs) => docs,
        Err(e) => {
            eprintln!("  ERROR: {e}");
            return Err(e.into());
        }
    };
    info!(count = documents.len(), path = %documents_path.display(), "Loaded documents");

    let index = Arc::new(GroundXClient::from_config(&config.groundx)?);
    let bucket = resolve_bucket(index.as_ref(), &config.groundx.bucket_name).await?;
    println!(
        "Ingesting {} documents into bucket {} (id {bucket})",
        documents.len(),
        config.groundx.bucket_name
    );

    let mut log_file = open_log(&log_path)
        .map_err(|e| format!("Failed to open ingest log {}: {e}", log_path.display()))?;
    let runner = IngestionRunner::new(index, bucket);
    let summary = runner
        .run(&documents, &mut log_file, &mut std::io::stdout())
        .await?;

    println!();
    println!("Done. Success: {}, Failed: {}", summary.success, summary.failed);
    println!("Log written to {}", log_path.display());
    Ok(())
}
