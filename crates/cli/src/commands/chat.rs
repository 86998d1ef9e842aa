//! `groundrag chat`: interactive question answering.

use std::path::Path;
use std::sync::Arc;

use groundrag_channels::CliChannel;
use groundrag_pipeline::{resolve_bucket, ChatSession};
use groundrag_providers::{GroundXClient, OpenAiCompatProvider};

use super::{load_config, CommandResult};

pub async fn run(config_path: &Path) -> CommandResult {
    let config = load_config(config_path)?;

    let index = Arc::new(GroundXClient::from_config(&config.groundx)?);
    let provider = Arc::new(OpenAiCompatProvider::from_config(&config.llm)?);

    let bucket = match resolve_bucket(index.as_ref(), &config.groundx.bucket_name).await {
        Ok(id) => id,
        Err(e) => {
            eprintln!();
            eprintln!("  ERROR: {e}");
            eprintln!();
            eprintln!("  Make sure the bucket exists by running `groundrag ingest` first,");
            eprintln!("  and check GROUNDX_API_KEY and GROUNDX_BUCKET_NAME.");
            eprintln!();
            return Err(e.into());
        }
    };

    println!();
    println!("  groundrag: ask questions about the ingested content");
    println!("  Bucket:  {} (id {bucket})", config.groundx.bucket_name);
    println!("  Model:   {}", config.llm.model);
    println!();

    let channel = CliChannel::new();
    let mut input = channel.start();
    let mut session = ChatSession::new(index, provider, bucket, &config.rag);
    session.run(&mut input, &mut std::io::stdout()).await?;

    Ok(())
}
