//! Config repository (`config` table).

use domain::models::app_config::{AppConfigChanges, NewAppConfig};
use sqlx::PgPool;

use super::lifecycle::{self, ContentTable};
use crate::entities::AppConfigEntity;
use crate::metrics::QueryTimer;

/// Repository for config entries.
#[derive(Clone)]
pub struct AppConfigRepository {
    pool: PgPool,
}

impl AppConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one row per target platform in a single transaction.
    pub async fn insert_batch(&self, configs: &[NewAppConfig]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("insert_configs");
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for config in configs {
            let result = sqlx::query(
                r#"
                INSERT INTO config (id, name, value, possible_values, type, describe, platform,
                                    status, create_time, update_time)
                VALUES ($1, $2, $3, $4, $5, $6, $7, 0, NOW(), NOW())
                "#,
            )
            .bind(config.id)
            .bind(&config.name)
            .bind(&config.value)
            .bind(&config.possible_values)
            .bind(config.value_type.as_i16())
            .bind(&config.describe)
            .bind(&config.platform)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        timer.record();
        Ok(inserted)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<AppConfigEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_config_by_id");
        let result = sqlx::query_as::<_, AppConfigEntity>(
            r#"
            SELECT * FROM config WHERE id = $1 AND status != 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, platform: Option<&str>) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_configs");
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM config
            WHERE status != 1 AND ($1::TEXT IS NULL OR platform = $1)
            "#,
        )
        .bind(platform)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(count.0)
    }

    /// Every live config, optionally for one platform. Config lists are not paginated.
    pub async fn list(&self, platform: Option<&str>) -> Result<Vec<AppConfigEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_configs");
        let result = sqlx::query_as::<_, AppConfigEntity>(
            r#"
            SELECT * FROM config
            WHERE status != 1 AND ($1::TEXT IS NULL OR platform = $1)
            ORDER BY status DESC, id DESC
            "#,
        )
        .bind(platform)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Distinct platforms that have at least one live config.
    pub async fn list_platforms(&self) -> Result<Vec<String>, sqlx::Error> {
        let timer = QueryTimer::new("list_config_platforms");
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT platform FROM config WHERE status != 1 GROUP BY platform ORDER BY platform
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        timer.record();
        Ok(rows.into_iter().map(|(platform,)| platform).collect())
    }

    pub async fn update(&self, id: i64, changes: &AppConfigChanges) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_config");
        let result = sqlx::query(
            r#"
            UPDATE config SET
                name = COALESCE($2, name),
                value = COALESCE($3, value),
                describe = COALESCE($4, describe),
                possible_values = COALESCE($5, possible_values),
                update_time = NOW()
            WHERE id = $1 AND status != 1
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.value.as_deref())
        .bind(changes.describe.as_deref())
        .bind(changes.possible_values.as_ref().into_option())
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn soft_delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        lifecycle::soft_delete(&self.pool, ContentTable::Config, id).await
    }
}
