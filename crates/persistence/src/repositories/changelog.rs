//! Changelog repository (`log` table).

use domain::models::changelog::{ChangelogChanges, NewChangelog};
use domain::models::ContentStatus;
use sqlx::PgPool;

use super::lifecycle::{self, ContentTable};
use crate::entities::ChangelogEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct ChangelogRepository {
    pool: PgPool,
}

impl ChangelogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_batch(&self, logs: &[NewChangelog]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("insert_changelogs");
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for log in logs {
            let result = sqlx::query(
                r#"
                INSERT INTO log (id, title, content, version_text, platform, status, create_time, update_time)
                VALUES ($1, $2, $3, $4, $5, 0, NOW(), NOW())
                "#,
            )
            .bind(log.id)
            .bind(&log.title)
            .bind(&log.content)
            .bind(&log.version_text)
            .bind(&log.platform)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        timer.record();
        Ok(inserted)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ChangelogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_changelog_by_id");
        let result = sqlx::query_as::<_, ChangelogEntity>(
            r#"
            SELECT * FROM log WHERE id = $1 AND status != 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, platform: Option<&str>) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_changelogs");
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM log
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
    ) -> Result<Vec<ChangelogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_changelogs");
        let result = sqlx::query_as::<_, ChangelogEntity>(
            r#"
            SELECT * FROM log
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

    pub async fn list_published(
        &self,
        platform: Option<&str>,
    ) -> Result<Vec<ChangelogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_published_changelogs");
        let result = sqlx::query_as::<_, ChangelogEntity>(
            r#"
            SELECT * FROM log
            WHERE status = 2 AND ($1::TEXT IS NULL OR platform = $1)
            ORDER BY id DESC
            "#,
        )
        .bind(platform)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(&self, id: i64, changes: &ChangelogChanges) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_changelog");
        let result = sqlx::query(
            r#"
            UPDATE log SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                version_text = COALESCE($4, version_text),
                platform = COALESCE($5, platform),
                status = COALESCE($6, status),
                update_time = NOW()
            WHERE id = $1 AND status != 1
            "#,
        )
        .bind(id)
        .bind(changes.title.as_deref())
        .bind(changes.content.as_deref())
        .bind(changes.version_text.as_deref())
        .bind(changes.platform.as_deref())
        .bind(changes.status.as_ref().into_option().map(|s| s.as_i16()))
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn soft_delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        lifecycle::soft_delete(&self.pool, ContentTable::Changelog, id).await
    }

    pub async fn publish(&self, ids: &[i64]) -> Result<u64, sqlx::Error> {
        lifecycle::batch_update_status(&self.pool, ContentTable::Changelog, ids, ContentStatus::Published)
            .await
    }
}
