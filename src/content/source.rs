use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use tracing::{error, info, warn};

use super::{ContentSnapshot, ContentSource};
use crate::errors::{HandbookError, Result};

/// Content source backed by a JSON export of the published tree
///
/// The file is read at startup and on every [`reload`](Self::reload).
/// Readers always get the last successfully loaded snapshot.
pub struct JsonFileContentSource {
    path: PathBuf,
    current: ArcSwapOption<ContentSnapshot>,
}

impl JsonFileContentSource {
    /// Create a source without loading anything; it reports "unavailable"
    /// until the first successful reload.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            current: ArcSwapOption::empty(),
        }
    }

    /// Create a source and load the snapshot file once
    pub async fn open<P: AsRef<Path>>(path: P) -> Self {
        let source = Self::new(path);
        source.reload().await;
        source
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the snapshot file. On failure the previous snapshot is kept.
    pub async fn reload(&self) -> bool {
        match self.load().await {
            Ok(snapshot) => {
                info!(
                    "Loaded content snapshot from {} ({} nodes)",
                    self.path.display(),
                    snapshot.len()
                );
                self.current.store(Some(Arc::new(snapshot)));
                true
            }
            Err(e) => {
                error!(
                    "Failed to load content snapshot {}: {}",
                    self.path.display(),
                    e
                );
                if self.current.load().is_some() {
                    warn!("Keeping previously loaded content snapshot");
                }
                false
            }
        }
    }

    async fn load(&self) -> Result<ContentSnapshot> {
        let json = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            HandbookError::content_load(format!("Cannot read {}: {}", self.path.display(), e))
        })?;
        ContentSnapshot::from_json(&json)
    }
}

#[async_trait]
impl ContentSource for JsonFileContentSource {
    async fn published(&self) -> Result<Option<Arc<ContentSnapshot>>> {
        Ok(self.current.load_full())
    }
}

/// Fixed snapshot, used by one-shot commands and tests
pub struct StaticContentSource {
    snapshot: Option<Arc<ContentSnapshot>>,
}

impl StaticContentSource {
    pub fn new(snapshot: ContentSnapshot) -> Self {
        Self {
            snapshot: Some(Arc::new(snapshot)),
        }
    }

    pub fn unavailable() -> Self {
        Self { snapshot: None }
    }
}

#[async_trait]
impl ContentSource for StaticContentSource {
    async fn published(&self) -> Result<Option<Arc<ContentSnapshot>>> {
        Ok(self.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let source = JsonFileContentSource::open("/nonexistent/content.json").await;
        assert!(source.published().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reload_keeps_last_good_snapshot() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"roots":[{{"id":1,"name":"Home","kind":"home"}}]}}"#
        )
        .unwrap();
        file.flush().unwrap();

        let source = JsonFileContentSource::open(file.path()).await;
        assert_eq!(source.published().await.unwrap().unwrap().len(), 1);

        std::fs::write(file.path(), "not json").unwrap();
        assert!(!source.reload().await);
        assert_eq!(source.published().await.unwrap().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticContentSource::new(ContentSnapshot::default());
        assert!(source.published().await.unwrap().is_some());
        let source = StaticContentSource::unavailable();
        assert!(source.published().await.unwrap().is_none());
    }
}
