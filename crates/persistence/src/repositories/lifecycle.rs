//! Status statements shared by every content table.
//!
//! Rows are never physically removed. Every statement except the soft delete itself
//! skips rows that are already deleted, so a deleted row stays deleted.

use domain::models::ContentStatus;
use sqlx::PgPool;

use crate::metrics::QueryTimer;

/// Tables that carry the shared `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentTable {
    Banner,
    Announcement,
    Changelog,
    Version,
    Config,
    AdminUser,
    Term,
}

impl ContentTable {
    pub const fn table_name(self) -> &'static str {
        match self {
            ContentTable::Banner => "banner",
            ContentTable::Announcement => "announcement",
            ContentTable::Changelog => "log",
            ContentTable::Version => "version",
            ContentTable::Config => "config",
            ContentTable::AdminUser => "admin_user",
            ContentTable::Term => "terms",
        }
    }

    fn soft_delete_sql(self) -> String {
        format!(
            "UPDATE {} SET status = {}, update_time = NOW() WHERE id = $1",
            self.table_name(),
            ContentStatus::Deleted.as_i16()
        )
    }

    fn batch_update_status_sql(self) -> String {
        format!(
            "UPDATE {} SET status = $2, update_time = NOW() WHERE id = ANY($1) AND status != {}",
            self.table_name(),
            ContentStatus::Deleted.as_i16()
        )
    }

    fn exists_sql(self) -> String {
        format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1 AND status != {})",
            self.table_name(),
            ContentStatus::Deleted.as_i16()
        )
    }
}

/// Marks a row deleted. Deleting twice is harmless and still reports the row.
pub async fn soft_delete(pool: &PgPool, table: ContentTable, id: i64) -> Result<u64, sqlx::Error> {
    let timer = QueryTimer::new(format!("soft_delete_{}", table.table_name()));
    let result = sqlx::query(&table.soft_delete_sql())
        .bind(id)
        .execute(pool)
        .await?;
    timer.record();
    Ok(result.rows_affected())
}

/// Moves every live row among `ids` to `status` in one statement.
///
/// Ids that do not match a live row are skipped silently; the count tells how many moved.
pub async fn batch_update_status(
    pool: &PgPool,
    table: ContentTable,
    ids: &[i64],
    status: ContentStatus,
) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }
    let timer = QueryTimer::new(format!("batch_update_status_{}", table.table_name()));
    let result = sqlx::query(&table.batch_update_status_sql())
        .bind(ids)
        .bind(status.as_i16())
        .execute(pool)
        .await?;
    timer.record();
    Ok(result.rows_affected())
}

/// Whether a live row with `id` exists.
pub async fn exists(pool: &PgPool, table: ContentTable, id: i64) -> Result<bool, sqlx::Error> {
    let timer = QueryTimer::new(format!("exists_{}", table.table_name()));
    let found: (bool,) = sqlx::query_as(&table.exists_sql())
        .bind(id)
        .fetch_one(pool)
        .await?;
    timer.record();
    Ok(found.0)
}
