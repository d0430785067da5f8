//! Object storage for banner images and release files.

mod local;
mod s3;

pub use local::LocalStorage;
pub use s3::S3Storage;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{StorageBackend, StorageConfig};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid object key: {0}")]
    InvalidKey(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Uploads a local file to `key`, publicly readable.
    async fn put_object_from_file(&self, key: &str, path: &Path) -> Result<(), StorageError>;

    /// Takes `key` out of public view without deleting it.
    async fn hide_object(&self, key: &str) -> Result<(), StorageError>;

    /// Makes `link_key` serve the same bytes as `target_key`.
    async fn put_symlink(&self, link_key: &str, target_key: &str) -> Result<(), StorageError>;
}

/// Builds the backend named in the configuration.
pub fn from_config(config: &StorageConfig) -> Result<Arc<dyn ObjectStorage>, StorageError> {
    Ok(match config.backend {
        StorageBackend::S3 => Arc::new(S3Storage::new(config)),
        StorageBackend::Local => Arc::new(LocalStorage::new(&config.local_root)?),
    })
}

/// Rejects keys that could escape the bucket prefix or the local root.
pub(crate) fn check_key(key: &str) -> Result<&str, StorageError> {
    let key = key.trim_start_matches('/');
    if key.is_empty() || key.split('/').any(|part| part.is_empty() || part == "." || part == "..") {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(key)
}

/// `Content-Type` guessed from the key's extension.
pub(crate) fn content_type(key: &str) -> String {
    mime_guess::from_path(key)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_key() {
        assert_eq!(check_key("/helper/pic/1.jpg").unwrap(), "helper/pic/1.jpg");
        assert!(check_key("helper/../etc/passwd").is_err());
        assert!(check_key("helper//x").is_err());
        assert!(check_key("").is_err());
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("helper/pic/1/v1.2.3.jpg"), "image/jpeg");
        assert_eq!(
            content_type("helper/version/9/app.apk"),
            "application/vnd.android.package-archive"
        );
        assert_eq!(content_type("helper/version/9/blob"), "application/octet-stream");
    }
}
