use std::{io::ErrorKind, path::PathBuf};

use serde_json::Value;
use tokio::fs;
use tracing::{debug, warn};

/// A read-only JSON document on disk, re-read on every access so edits to
/// the file are picked up without a restart.
#[derive(Debug, Clone)]
pub struct JsonDocument {
    file_path: PathBuf,
}

impl JsonDocument {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into() }
    }

    /// `None` when the file is absent or not valid JSON.
    pub async fn read(&self) -> Option<Value> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.file_path.display(), "document not found");
                return None;
            }
            Err(e) => {
                warn!(path = %self.file_path.display(), error = %e, "document read failed");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(path = %self.file_path.display(), error = %e, "document is not valid JSON");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_valid_and_rejects_invalid() -> Result<(), anyhow::Error> {
        let path = std::env::temp_dir().join(format!("json_doc_{}.json", uuid::Uuid::new_v4()));
        let doc = JsonDocument::new(&path);
        assert!(doc.read().await.is_none());

        fs::write(&path, br#"{"version": "1.2"}"#).await?;
        assert_eq!(doc.read().await, Some(serde_json::json!({"version": "1.2"})));

        fs::write(&path, b"nope").await?;
        assert!(doc.read().await.is_none());

        let _ = fs::remove_file(&path).await;
        Ok(())
    }
}
