//! Bucket resolution by name.

use groundrag_core::error::{Error, Result};
use groundrag_core::index::{BucketId, IndexClient};
use tracing::{debug, info};

/// Find the bucket called `name`, creating it when no such bucket exists.
///
/// The first match in listing order wins. Any index failure is reported as
/// [`Error::BucketResolution`].
pub async fn resolve_bucket(index: &dyn IndexClient, name: &str) -> Result<BucketId> {
    let resolution_error = |reason: String| Error::BucketResolution {
        bucket: name.to_string(),
        reason,
    };

    debug!(bucket = %name, "Looking up bucket");
    let buckets = index
        .list_buckets()
        .await
        .map_err(|e| resolution_error(e.to_string()))?;
    debug!(index = index.name(), count = buckets.len(), "Listed buckets");

    if let Some(existing) = buckets.iter().find(|b| b.name == name) {
        info!(bucket = %name, id = %existing.id, "Using existing bucket");
        return Ok(existing.id);
    }

    info!(bucket = %name, "Bucket not found, creating it");
    let created = index
        .create_bucket(name)
        .await
        .map_err(|e| resolution_error(e.to_string()))?;
    info!(bucket = %name, id = %created.id, "Created bucket");
    Ok(created.id)
}
