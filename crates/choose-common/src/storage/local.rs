//! Local filesystem object store
//!
//! Every object is one file directly under the media root. Names are flat:
//! anything that could escape the root is refused.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use choose_core::{DomainError, ObjectStore};
use tracing::{debug, instrument};

/// Object store backed by a directory
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    /// Create the root directory if it does not exist yet
    pub async fn ensure_root(&self) -> Result<(), DomainError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| DomainError::StorageError(format!("cannot create media root: {e}")))
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, DomainError> {
        if !is_valid_name(name) {
            return Err(DomainError::MediaNotFound(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

/// A stored name is a single, non-hidden path component
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name.len() <= 255
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), DomainError> {
        let path = self.path_for(name)?;
        self.ensure_root().await?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::StorageError(format!("failed to write {name}: {e}")))?;
        debug!(path = %path.display(), "Stored object");
        Ok(())
    }

    async fn exists(&self, name: &str) -> Result<bool, DomainError> {
        if !is_valid_name(name) {
            return Ok(false);
        }
        tokio::fs::try_exists(self.root.join(name))
            .await
            .map_err(|e| DomainError::StorageError(e.to_string()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, name: &str) -> Result<(), DomainError> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::StorageError(format!(
                "failed to delete {name}: {e}"
            ))),
        }
    }

    async fn open(&self, name: &str) -> Result<Vec<u8>, DomainError> {
        let path = self.path_for(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(DomainError::MediaNotFound(name.to_string()))
            }
            Err(e) => Err(DomainError::StorageError(format!("failed to read {name}: {e}"))),
        }
    }

    fn url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }
}
