//! Directory-backed storage for development and tests.
//!
//! Public objects live under the root at their key; hidden objects are moved below
//! `.hidden/` so they stop being served but can still be recovered.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{check_key, ObjectStorage, StorageError};

const HIDDEN_DIR: &str = ".hidden";

#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path of a public object.
    pub fn object_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        Ok(self.root.join(check_key(key)?))
    }

    /// Filesystem path a hidden object is moved to.
    pub fn hidden_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        Ok(self.root.join(HIDDEN_DIR).join(check_key(key)?))
    }
}

async fn copy_into_place(from: &Path, to: &Path) -> Result<(), StorageError> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::copy(from, to).await?;
    Ok(())
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn put_object_from_file(&self, key: &str, path: &Path) -> Result<(), StorageError> {
        copy_into_place(path, &self.object_path(key)?).await
    }

    async fn hide_object(&self, key: &str) -> Result<(), StorageError> {
        let public = self.object_path(key)?;
        if fs::metadata(&public).await.is_err() {
            // Nothing was ever uploaded under this key.
            return Ok(());
        }
        let hidden = self.hidden_path(key)?;
        if let Some(parent) = hidden.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::rename(&public, &hidden).await?;
        Ok(())
    }

    async fn put_symlink(&self, link_key: &str, target_key: &str) -> Result<(), StorageError> {
        let target = self.object_path(target_key)?;
        copy_into_place(&target, &self.object_path(link_key)?).await
    }
}
