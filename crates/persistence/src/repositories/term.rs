//! Term repository (`terms` table).

use domain::models::term::{NewTerm, TermChanges};
use sqlx::PgPool;

use super::lifecycle::{self, ContentTable};
use crate::entities::TermEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct TermRepository {
    pool: PgPool,
}

impl TermRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, term: &NewTerm) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("insert_term");
        let result = sqlx::query(
            r#"
            INSERT INTO terms (id, term, start, status, create_time, update_time)
            VALUES ($1, $2, $3, 0, NOW(), NOW())
            "#,
        )
        .bind(term.id)
        .bind(&term.term)
        .bind(term.start_date)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Every live term, earliest start first.
    pub async fn list(&self) -> Result<Vec<TermEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_terms");
        let result = sqlx::query_as::<_, TermEntity>(
            r#"
            SELECT * FROM terms WHERE status != 1 ORDER BY start ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(&self, id: i64, changes: &TermChanges) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_term");
        let result = sqlx::query(
            r#"
            UPDATE terms SET
                term = COALESCE($2, term),
                start = COALESCE($3, start),
                update_time = NOW()
            WHERE id = $1 AND status != 1
            "#,
        )
        .bind(id)
        .bind(changes.term.as_deref())
        .bind(changes.start_date.as_ref().into_option().copied())
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn soft_delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        lifecycle::soft_delete(&self.pool, ContentTable::Term, id).await
    }

    pub async fn exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        lifecycle::exists(&self.pool, ContentTable::Term, id).await
    }
}
