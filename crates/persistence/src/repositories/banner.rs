//! Banner repository for database operations.

use domain::models::banner::{BannerChanges, NewBanner};
use domain::models::ContentStatus;
use sqlx::PgPool;

use super::lifecycle::{self, ContentTable};
use crate::entities::BannerEntity;
use crate::metrics::QueryTimer;

/// Repository for banner-related database operations.
#[derive(Clone)]
pub struct BannerRepository {
    pool: PgPool,
}

impl BannerRepository {
    /// Creates a new BannerRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one row per target platform in a single transaction.
    pub async fn insert_batch(&self, banners: &[NewBanner]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("insert_banners");
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for banner in banners {
            let result = sqlx::query(
                r#"
                INSERT INTO banner (id, title, link, img, platform, status, create_time, update_time)
                VALUES ($1, $2, $3, $4, $5, 0, NOW(), NOW())
                "#,
            )
            .bind(banner.id)
            .bind(&banner.title)
            .bind(&banner.link)
            .bind(&banner.img)
            .bind(&banner.platform)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        timer.record();
        Ok(inserted)
    }

    /// Find a banner that is not deleted.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<BannerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_banner_by_id");
        let result = sqlx::query_as::<_, BannerEntity>(
            r#"
            SELECT * FROM banner WHERE id = $1 AND status != 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count banners visible to admins, optionally for one platform.
    pub async fn count(&self, platform: Option<&str>) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_banners");
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM banner
            WHERE status != 1 AND ($1::TEXT IS NULL OR platform = $1)
            "#,
        )
        .bind(platform)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(count.0)
    }

    /// One admin page, published first, newest first.
    pub async fn list(
        &self,
        platform: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BannerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_banners");
        let result = sqlx::query_as::<_, BannerEntity>(
            r#"
            SELECT * FROM banner
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

    /// Published banners for the public feed, newest first.
    pub async fn list_published(
        &self,
        platform: Option<&str>,
    ) -> Result<Vec<BannerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_published_banners");
        let result = sqlx::query_as::<_, BannerEntity>(
            r#"
            SELECT * FROM banner
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

    /// Partial update; unset fields keep their value and `update_time` is always refreshed.
    pub async fn update(&self, id: i64, changes: &BannerChanges) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_banner");
        let result = sqlx::query(
            r#"
            UPDATE banner SET
                title = COALESCE($2, title),
                link = COALESCE($3, link),
                img = COALESCE($4, img),
                platform = COALESCE($5, platform),
                status = COALESCE($6, status),
                update_time = NOW()
            WHERE id = $1 AND status != 1
            "#,
        )
        .bind(id)
        .bind(changes.title.as_deref())
        .bind(changes.link.as_deref())
        .bind(changes.img.as_deref())
        .bind(changes.platform.as_deref())
        .bind(changes.status.as_ref().into_option().map(|s| s.as_i16()))
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn soft_delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        lifecycle::soft_delete(&self.pool, ContentTable::Banner, id).await
    }

    /// Publish every live banner among `ids`.
    pub async fn publish(&self, ids: &[i64]) -> Result<u64, sqlx::Error> {
        lifecycle::batch_update_status(&self.pool, ContentTable::Banner, ids, ContentStatus::Published)
            .await
    }
}
