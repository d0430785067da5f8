//! Removes staged uploads that were never pushed to storage.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use super::scheduler::{Job, JobFrequency};

/// Staged files older than this are assumed orphaned by a failed upload.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 3600);

pub struct UploadTmpSweepJob {
    dir: PathBuf,
    max_age: Duration,
}

impl UploadTmpSweepJob {
    pub fn new(dir: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            dir: dir.into(),
            max_age,
        }
    }

    /// Deletes expired files directly under the staging directory; returns how many.
    pub async fn sweep(&self) -> anyhow::Result<usize> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let now = SystemTime::now();
        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let age = now
                .duration_since(metadata.modified()?)
                .unwrap_or_default();
            if age >= self.max_age {
                tokio::fs::remove_file(entry.path()).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[async_trait::async_trait]
impl Job for UploadTmpSweepJob {
    fn name(&self) -> &'static str {
        "upload_tmp_sweep"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> anyhow::Result<()> {
        let removed = self.sweep().await?;
        if removed > 0 {
            tracing::info!(removed, dir = %self.dir.display(), "removed orphaned uploads");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sweep_respects_age() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.part"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let keep = UploadTmpSweepJob::new(dir.path(), DEFAULT_MAX_AGE);
        assert_eq!(keep.sweep().await.unwrap(), 0);

        let purge = UploadTmpSweepJob::new(dir.path(), Duration::ZERO);
        assert_eq!(purge.sweep().await.unwrap(), 1);
        assert!(!dir.path().join("a.part").exists());
        assert!(dir.path().join("nested").exists());
    }

    #[tokio::test]
    async fn test_missing_dir_is_fine() {
        let job = UploadTmpSweepJob::new("/nonexistent/helper-admin-tmp", Duration::ZERO);
        assert_eq!(job.sweep().await.unwrap(), 0);
    }
}
