use std::{io::ErrorKind, marker::PhantomData, path::PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tracing::{debug, error};

/// Result of reading a list file. Both `Missing` and `Unreadable` degrade to
/// an empty list; callers log the difference.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    Loaded(Vec<T>),
    Missing,
    Unreadable(String),
}

impl<T> LoadOutcome<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            LoadOutcome::Loaded(items) => items,
            LoadOutcome::Missing | LoadOutcome::Unreadable(_) => Vec::new(),
        }
    }

    pub fn is_unreadable(&self) -> bool {
        matches!(self, LoadOutcome::Unreadable(_))
    }
}

/// A JSON array persisted to a single file, pretty-printed UTF-8.
///
/// Nothing is cached: every `load` reads the file and every `save` replaces it
/// by writing a sibling `.tmp` file and renaming it into place.
#[derive(Debug, Clone)]
pub struct JsonListFile<T> {
    file_path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonListFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into(), _marker: PhantomData }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.file_path
    }

    pub async fn load(&self) -> LoadOutcome<T> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return LoadOutcome::Missing,
            Err(e) => return LoadOutcome::Unreadable(e.to_string()),
        };
        match serde_json::from_slice::<Vec<T>>(&bytes) {
            Ok(items) => LoadOutcome::Loaded(items),
            Err(e) => LoadOutcome::Unreadable(e.to_string()),
        }
    }

    /// Write the whole list back. Returns `false` on any failure.
    pub async fn save(&self, items: &[T]) -> bool {
        match self.try_save(items).await {
            Ok(()) => {
                debug!(path = %self.file_path.display(), count = items.len(), "list file saved");
                true
            }
            Err(e) => {
                error!(path = %self.file_path.display(), error = %e, "list file save failed");
                false
            }
        }
    }

    async fn try_save(&self, items: &[T]) -> std::io::Result<()> {
        let data = serde_json::to_vec_pretty(items)?;
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.file_path.with_extension("tmp");
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, &self.file_path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("json_list_{}_{}.json", tag, uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_file_is_reported_as_missing() {
        let file = JsonListFile::<String>::new(temp_path("missing"));
        assert_eq!(file.load().await, LoadOutcome::Missing);
    }

    #[tokio::test]
    async fn corrupted_file_is_unreadable_and_empty() -> Result<(), anyhow::Error> {
        let path = temp_path("corrupt");
        fs::write(&path, b"{ not json").await?;
        let file = JsonListFile::<String>::new(&path);
        let outcome = file.load().await;
        assert!(outcome.is_unreadable());
        assert!(outcome.into_items().is_empty());

        // an object instead of an array is just as unreadable
        fs::write(&path, br#"{"a": 1}"#).await?;
        assert!(file.load().await.is_unreadable());

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_then_load_pretty_printed() -> Result<(), anyhow::Error> {
        let path = std::env::temp_dir()
            .join(format!("json_list_nested_{}", uuid::Uuid::new_v4()))
            .join("list.json");
        let file = JsonListFile::<String>::new(&path);
        assert!(file.save(&["a".to_string(), "b".to_string()]).await);

        let text = fs::read_to_string(&path).await?;
        assert_eq!(text, "[\n  \"a\",\n  \"b\"\n]");
        assert_eq!(file.load().await, LoadOutcome::Loaded(vec!["a".to_string(), "b".to_string()]));
        assert!(fs::metadata(path.with_extension("tmp")).await.is_err());

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir).await;
        }
        Ok(())
    }

    #[tokio::test]
    async fn save_into_unwritable_location_returns_false() -> Result<(), anyhow::Error> {
        // a regular file where the parent directory should be
        let blocker = temp_path("blocker");
        fs::write(&blocker, b"x").await?;
        let file = JsonListFile::<String>::new(blocker.join("list.json"));
        assert!(!file.save(&["a".to_string()]).await);
        let _ = fs::remove_file(&blocker).await;
        Ok(())
    }
}
