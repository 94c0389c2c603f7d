//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the data directory exists, creating it when missing.
pub async fn ensure_data_dir(data_dir: &Path) -> anyhow::Result<()> {
    if tokio::fs::metadata(data_dir).await.is_err() {
        info!(data_dir = %data_dir.display(), "creating data directory");
    }
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;
    Ok(())
}

/// Warn about read-only documents that are not present yet; they are served
/// as 404 until someone drops them in place.
pub async fn check_documents(paths: &[&Path]) {
    for path in paths {
        if tokio::fs::metadata(path).await.is_err() {
            warn!(path = %path.display(), "document not found; endpoint will answer 404");
        }
    }
}
