//! Announcement repository for database operations.

use domain::models::announcement::{AnnouncementChanges, NewAnnouncement};
use domain::models::ContentStatus;
use sqlx::PgPool;

use super::lifecycle::{self, ContentTable};
use crate::entities::AnnouncementEntity;
use crate::metrics::QueryTimer;

/// Repository for announcement-related database operations.
#[derive(Clone)]
pub struct AnnouncementRepository {
    pool: PgPool,
}

impl AnnouncementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one row per target platform in a single transaction.
    pub async fn insert_batch(
        &self,
        announcements: &[NewAnnouncement],
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("insert_announcements");
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for announcement in announcements {
            let result = sqlx::query(
                r#"
                INSERT INTO announcement (id, title, content, target, platform, status, create_time, update_time)
                VALUES ($1, $2, $3, $4, $5, 0, NOW(), NOW())
                "#,
            )
            .bind(announcement.id)
            .bind(&announcement.title)
            .bind(&announcement.content)
            .bind(&announcement.target)
            .bind(&announcement.platform)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        timer.record();
        Ok(inserted)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<AnnouncementEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_announcement_by_id");
        let result = sqlx::query_as::<_, AnnouncementEntity>(
            r#"
            SELECT * FROM announcement WHERE id = $1 AND status != 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, platform: Option<&str>) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_announcements");
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM announcement
            WHERE status != 1 AND ($1::TEXT IS NULL OR platform = $1)
            "#,
        )
        .bind(platform)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(count.0)
    }

    /// One admin page: published first, newest first, then by platform.
    pub async fn list(
        &self,
        platform: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AnnouncementEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_announcements");
        let result = sqlx::query_as::<_, AnnouncementEntity>(
            r#"
            SELECT * FROM announcement
            WHERE status != 1 AND ($1::TEXT IS NULL OR platform = $1)
            ORDER BY status DESC, id DESC, platform ASC
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

    /// Published announcements in creation order.
    pub async fn list_published(
        &self,
        platform: Option<&str>,
    ) -> Result<Vec<AnnouncementEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_published_announcements");
        let result = sqlx::query_as::<_, AnnouncementEntity>(
            r#"
            SELECT * FROM announcement
            WHERE status = 2 AND ($1::TEXT IS NULL OR platform = $1)
            ORDER BY id ASC
            "#,
        )
        .bind(platform)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: i64,
        changes: &AnnouncementChanges,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_announcement");
        let result = sqlx::query(
            r#"
            UPDATE announcement SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                target = COALESCE($4, target),
                platform = COALESCE($5, platform),
                status = COALESCE($6, status),
                update_time = NOW()
            WHERE id = $1 AND status != 1
            "#,
        )
        .bind(id)
        .bind(changes.title.as_deref())
        .bind(changes.content.as_deref())
        .bind(changes.target.as_deref())
        .bind(changes.platform.as_deref())
        .bind(changes.status.as_ref().into_option().map(|s| s.as_i16()))
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn soft_delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        lifecycle::soft_delete(&self.pool, ContentTable::Announcement, id).await
    }

    pub async fn publish(&self, ids: &[i64]) -> Result<u64, sqlx::Error> {
        lifecycle::batch_update_status(
            &self.pool,
            ContentTable::Announcement,
            ids,
            ContentStatus::Published,
        )
        .await
    }
}
