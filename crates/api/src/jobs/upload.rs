//! Background upload queue.
//!
//! Handlers stage uploaded bytes in a temp file, commit the row, then enqueue a job.
//! A single worker pushes files to object storage in FIFO order. Jobs are attempted
//! once; a failed job runs its failure action and is dropped.

use std::path::PathBuf;
use std::sync::Arc;

use persistence::repositories::VersionRepository;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::middleware::metrics::record_upload;
use crate::storage::ObjectStorage;

pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    File,
}

impl UploadKind {
    fn label(self) -> &'static str {
        match self {
            UploadKind::Image => "image",
            UploadKind::File => "file",
        }
    }
}

/// Compensation run when an upload fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureAction {
    /// Detach `file` from version `id` so clients are not sent a dead link.
    ClearVersionFile { id: i64, file: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadJob {
    Put {
        kind: UploadKind,
        key: String,
        path: PathBuf,
        on_failure: Option<FailureAction>,
    },
    Hide {
        key: String,
    },
    Symlink {
        link_key: String,
        target_key: String,
    },
}

impl UploadJob {
    fn kind_label(&self) -> &'static str {
        match self {
            UploadJob::Put { kind, .. } => kind.label(),
            UploadJob::Hide { .. } => "hide",
            UploadJob::Symlink { .. } => "symlink",
        }
    }
}

/// Sending half, cloned into the app state.
#[derive(Debug, Clone)]
pub struct UploadQueue {
    tx: mpsc::Sender<UploadJob>,
}

impl UploadQueue {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<UploadJob>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Queues a job, waiting for room when the queue is full.
    ///
    /// The request has already committed its row, so a closed queue is only logged.
    pub async fn enqueue(&self, job: UploadJob) {
        let kind = job.kind_label();
        if let Err(mpsc::error::SendError(job)) = self.tx.send(job).await {
            error!(kind, ?job, "upload queue closed, job dropped");
            record_upload(kind, "dropped");
        }
    }

    /// Jobs waiting for the worker.
    pub fn pending(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// Whether the worker has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

pub struct UploadWorker {
    rx: mpsc::Receiver<UploadJob>,
    storage: Arc<dyn ObjectStorage>,
    versions: VersionRepository,
}

impl UploadWorker {
    pub fn new(
        rx: mpsc::Receiver<UploadJob>,
        storage: Arc<dyn ObjectStorage>,
        versions: VersionRepository,
    ) -> Self {
        Self {
            rx,
            storage,
            versions,
        }
    }

    /// Runs until every `UploadQueue` handle is dropped and the queue is drained.
    pub fn spawn(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("upload worker started");
            while let Some(job) = self.rx.recv().await {
                self.run(job).await;
            }
            info!("upload worker stopped");
        })
    }

    async fn run(&self, job: UploadJob) {
        let kind = job.kind_label();
        match job {
            UploadJob::Put {
                key,
                path,
                on_failure,
                ..
            } => match self.storage.put_object_from_file(&key, &path).await {
                Ok(()) => {
                    record_upload(kind, "ok");
                    debug!(kind, key = %key, "object uploaded");
                    if let Err(e) = tokio::fs::remove_file(&path).await {
                        warn!(path = %path.display(), error = %e, "failed to remove staged upload");
                    }
                }
                Err(e) => {
                    record_upload(kind, "failed");
                    error!(kind, key = %key, error = %e, "upload failed");
                    if let Some(action) = on_failure {
                        self.compensate(action).await;
                    }
                }
            },
            UploadJob::Hide { key } => match self.storage.hide_object(&key).await {
                Ok(()) => record_upload(kind, "ok"),
                Err(e) => {
                    record_upload(kind, "failed");
                    warn!(key = %key, error = %e, "failed to hide object");
                }
            },
            UploadJob::Symlink {
                link_key,
                target_key,
            } => match self.storage.put_symlink(&link_key, &target_key).await {
                Ok(()) => record_upload(kind, "ok"),
                Err(e) => {
                    record_upload(kind, "failed");
                    error!(
                        link_key = %link_key,
                        target_key = %target_key,
                        error = %e,
                        "failed to update release link"
                    );
                }
            },
        }
    }

    async fn compensate(&self, action: FailureAction) {
        match action {
            FailureAction::ClearVersionFile { id, file } => {
                match self.versions.clear_file(id, &file).await {
                    Ok(rows) => {
                        warn!(version_id = id, rows, "version file cleared after failed upload")
                    }
                    Err(e) => error!(version_id = id, error = %e, "failed to clear version file"),
                }
            }
        }
    }
}
