//! Version repository for database operations.
//!
//! Publishing is exclusive per platform: [`VersionRepository::publish`] demotes the
//! platform's current release and promotes the target inside one transaction.

use domain::models::version::{NewVersion, VersionChanges};
use sqlx::PgPool;

use super::lifecycle::{self, ContentTable};
use crate::entities::VersionEntity;
use crate::metrics::QueryTimer;

/// Repository for version-related database operations.
#[derive(Clone)]
pub struct VersionRepository {
    pool: PgPool,
}

impl VersionRepository {
    /// Creates a new VersionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, version: &NewVersion) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("insert_version");
        let result = sqlx::query(
            r#"
            INSERT INTO version (id, version_text, summary, file, platform, status, create_time, update_time)
            VALUES ($1, $2, $3, $4, $5, 0, NOW(), NOW())
            "#,
        )
        .bind(version.id)
        .bind(&version.version_text)
        .bind(&version.summary)
        .bind(&version.file)
        .bind(&version.platform)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Find a version that is not deleted.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<VersionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_version_by_id");
        let result = sqlx::query_as::<_, VersionEntity>(
            r#"
            SELECT * FROM version WHERE id = $1 AND status != 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, platform: Option<&str>) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_versions");
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM version
            WHERE status != 1 AND ($1::TEXT IS NULL OR platform = $1)
            "#,
        )
        .bind(platform)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(count.0)
    }

    pub async fn list(
        &self,
        platform: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VersionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_versions");
        let result = sqlx::query_as::<_, VersionEntity>(
            r#"
            SELECT * FROM version
            WHERE status != 1 AND ($1::TEXT IS NULL OR platform = $1)
            ORDER BY status DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(platform)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The published version with the highest version text on `platform`.
    pub async fn find_latest_published(
        &self,
        platform: &str,
    ) -> Result<Option<VersionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_latest_published_version");
        let result = sqlx::query_as::<_, VersionEntity>(
            r#"
            SELECT * FROM version
            WHERE status = 2 AND platform = $1
            ORDER BY version_text DESC
            LIMIT 1
            "#,
        )
        .bind(platform)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Partial update of the text fields and the file key.
    pub async fn update(&self, id: i64, changes: &VersionChanges) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_version");
        let result = sqlx::query(
            r#"
            UPDATE version SET
                version_text = COALESCE($2, version_text),
                summary = COALESCE($3, summary),
                file = COALESCE($4, file),
                platform = COALESCE($5, platform),
                update_time = NOW()
            WHERE id = $1 AND status != 1
            "#,
        )
        .bind(id)
        .bind(changes.version_text.as_deref())
        .bind(changes.summary.as_deref())
        .bind(changes.file.as_deref())
        .bind(changes.platform.as_deref())
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Detach the file from a version, but only if it still points at `file`.
    pub async fn clear_file(&self, id: i64, file: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("clear_version_file");
        let result = sqlx::query(
            r#"
            UPDATE version SET file = '', update_time = NOW()
            WHERE id = $1 AND file = $2
            "#,
        )
        .bind(id)
        .bind(file)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn soft_delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        lifecycle::soft_delete(&self.pool, ContentTable::Version, id).await
    }

    /// Make `id` the only published version of its platform.
    ///
    /// Returns `None` (and changes nothing) when `id` is missing or deleted. Any error
    /// rolls the transaction back.
    ///
    /// The per-platform advisory lock is taken before any row lock, so publishes on one
    /// platform queue up instead of deadlocking on each other's demote.
    pub async fn publish(&self, id: i64) -> Result<Option<VersionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("publish_version");
        let mut tx = self.pool.begin().await?;

        let mut platform = match live_platform(&mut tx, id, false).await? {
            Some(platform) => platform,
            None => {
                tx.rollback().await?;
                timer.record();
                return Ok(None);
            }
        };

        loop {
            sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
                .bind(&platform)
                .execute(&mut *tx)
                .await?;

            match live_platform(&mut tx, id, true).await? {
                Some(current) if current == platform => break,
                // Moved to another platform meanwhile; lock that one too.
                Some(current) => platform = current,
                None => {
                    tx.rollback().await?;
                    timer.record();
                    return Ok(None);
                }
            }
        }

        let demoted = sqlx::query(
            r#"
            UPDATE version SET status = 0, update_time = NOW()
            WHERE platform = $1 AND status = 2
            "#,
        )
        .bind(&platform)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let published = sqlx::query_as::<_, VersionEntity>(
            r#"
            UPDATE version SET status = 2, update_time = NOW()
            WHERE id = $1 AND status != 1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        tracing::debug!(version_id = id, %platform, demoted, "version publish committed");
        Ok(published)
    }

    /// Published versions per platform; used to check the exclusivity invariant.
    pub async fn count_published(&self, platform: &str) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_published_versions");
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM version WHERE status = 2 AND platform = $1
            "#,
        )
        .bind(platform)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(count.0)
    }
}

/// Platform of the live version `id`, optionally taking its row lock.
async fn live_platform(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    id: i64,
    lock: bool,
) -> Result<Option<String>, sqlx::Error> {
    let sql = if lock {
        "SELECT platform FROM version WHERE id = $1 AND status != 1 FOR UPDATE"
    } else {
        "SELECT platform FROM version WHERE id = $1 AND status != 1"
    };
    let row: Option<(String,)> = sqlx::query_as(sql)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row.map(|(platform,)| platform))
}
