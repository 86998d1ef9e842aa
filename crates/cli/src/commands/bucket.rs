//! `groundrag bucket`: resolve or create the configured bucket.

use std::path::Path;

use groundrag_pipeline::resolve_bucket;
use groundrag_providers::GroundXClient;

use super::{load_config, CommandResult};

pub async fn run(config_path: &Path) -> CommandResult {
    let config = load_config(config_path)?;
    let index = GroundXClient::from_config(&config.groundx)?;

    let id = resolve_bucket(&index, &config.groundx.bucket_name).await?;
    println!("{}: {id}", config.groundx.bucket_name);
    Ok(())
}
