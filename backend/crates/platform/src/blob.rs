//! Blob Storage
//!
//! Opaque put/delete/url storage used by upload flows (course thumbnails).
//! The filesystem backend serves files from a directory that the reverse
//! proxy exposes under `public_base_url`.

use std::path::{Path, PathBuf};

/// Blob store errors
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("Invalid blob key: {0}")]
    InvalidKey(String),

    #[error("Blob I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Blob storage trait
#[trait_variant::make(BlobStore: Send)]
pub trait LocalBlobStore {
    /// Store `bytes` under `key`, replacing any existing blob
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), BlobError>;

    /// Delete the blob under `key`; deleting a missing blob is not an error
    async fn delete(&self, key: &str) -> Result<(), BlobError>;

    /// Public URL of the blob under `key`
    fn url(&self, key: &str) -> String;
}

/// Filesystem-backed blob store
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, BlobError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

impl BlobStore for FsBlobStore {
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), BlobError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        tracing::info!(key = %key, content_type = %content_type, size = bytes.len(), "Blob stored");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(key = %key, "Blob deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

/// Keys are relative paths of `[A-Za-z0-9._-]` segments
fn validate_key(key: &str) -> Result<(), BlobError> {
    let valid = !key.is_empty()
        && !key.starts_with('/')
        && key.split('/').all(|segment| {
            !segment.is_empty()
                && segment != "."
                && segment != ".."
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        });

    if valid {
        Ok(())
    } else {
        Err(BlobError::InvalidKey(key.to_string()))
    }
}
