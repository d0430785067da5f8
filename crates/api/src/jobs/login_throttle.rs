//! Forgets idle login limiters so the map does not grow with every username tried.

use std::sync::Arc;

use super::scheduler::{Job, JobFrequency};
use crate::middleware::LoginThrottle;

pub struct LoginThrottleCleanupJob {
    throttle: Arc<LoginThrottle>,
}

impl LoginThrottleCleanupJob {
    pub fn new(throttle: Arc<LoginThrottle>) -> Self {
        Self { throttle }
    }
}

#[async_trait::async_trait]
impl Job for LoginThrottleCleanupJob {
    fn name(&self) -> &'static str {
        "login_throttle_cleanup"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(5)
    }

    async fn execute(&self) -> anyhow::Result<()> {
        let before = self.throttle.tracked();
        self.throttle.retain_recent();
        tracing::debug!(before, after = self.throttle.tracked(), "login limiters pruned");
        Ok(())
    }
}
