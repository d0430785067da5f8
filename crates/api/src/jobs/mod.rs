//! Background work: the upload queue and periodic maintenance jobs.

mod login_throttle;
mod pool_metrics;
mod scheduler;
mod tmp_sweep;
pub mod upload;

pub use login_throttle::LoginThrottleCleanupJob;
pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
pub use tmp_sweep::{UploadTmpSweepJob, DEFAULT_MAX_AGE as UPLOAD_TMP_MAX_AGE};
pub use upload::{FailureAction, UploadJob, UploadKind, UploadQueue, UploadWorker};
