//! Query timing and pool gauges.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::borrow::Cow;
use std::time::{Duration, Instant};

/// Histogram every repository query reports into, labelled by `query`.
pub const QUERY_DURATION_METRIC: &str = "database_query_duration_seconds";

pub fn record_query_duration(query_name: impl Into<String>, duration_secs: f64) {
    histogram!(QUERY_DURATION_METRIC, "query" => query_name.into()).record(duration_secs);
}

/// Snapshot of the pool size; called by the pool metrics job.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("database_connections_active").set(size.saturating_sub(idle) as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Wall-clock timer for one repository query.
///
/// ```ignore
/// let timer = QueryTimer::new("find_banner_by_id");
/// let row = sqlx::query_as::<_, BannerEntity>(..).fetch_optional(&pool).await;
/// timer.record();
/// ```
///
/// A timer dropped without `record` (early `?` return) reports nothing, so failed
/// queries do not skew the histogram.
pub struct QueryTimer {
    query_name: Cow<'static, str>,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            query_name: query_name.into(),
            start: Instant::now(),
        }
    }

    /// Reports the elapsed time and returns it.
    pub fn record(self) -> Duration {
        let elapsed = self.start.elapsed();
        record_query_duration(self.query_name.into_owned(), elapsed.as_secs_f64());
        elapsed
    }
}
