//! Admin user repository for database operations.

use domain::models::admin_user::{AdminUserChanges, NewAdminUser};
use sqlx::PgPool;

use super::lifecycle::{self, ContentTable};
use crate::entities::AdminUserEntity;
use crate::metrics::QueryTimer;

/// Repository for admin accounts.
#[derive(Clone)]
pub struct AdminUserRepository {
    pool: PgPool,
}

impl AdminUserRepository {
    /// Creates a new AdminUserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, user: &NewAdminUser) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("insert_admin_user");
        let result = sqlx::query(
            r#"
            INSERT INTO admin_user (id, username, password, group_id, status, create_time, update_time)
            VALUES ($1, $2, $3, $4, 0, NOW(), NOW())
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.group.as_i16())
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<AdminUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_admin_user_by_id");
        let result = sqlx::query_as::<_, AdminUserEntity>(
            r#"
            SELECT * FROM admin_user WHERE id = $1 AND status != 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_admin_user_by_username");
        let result = sqlx::query_as::<_, AdminUserEntity>(
            r#"
            SELECT * FROM admin_user WHERE username = $1 AND status != 1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("admin_username_exists");
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (SELECT 1 FROM admin_user WHERE username = $1 AND status != 1)
            "#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(exists.0)
    }

    /// Live accounts; zero means the service has no way in yet.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_admin_users");
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM admin_user WHERE status != 1
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(count.0)
    }

    /// All live accounts, oldest first.
    pub async fn list(&self) -> Result<Vec<AdminUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_admin_users");
        let result = sqlx::query_as::<_, AdminUserEntity>(
            r#"
            SELECT * FROM admin_user WHERE status != 1 ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(&self, id: i64, changes: &AdminUserChanges) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_admin_user");
        let result = sqlx::query(
            r#"
            UPDATE admin_user SET
                username = COALESCE($2, username),
                password = COALESCE($3, password),
                group_id = COALESCE($4, group_id),
                update_time = NOW()
            WHERE id = $1 AND status != 1
            "#,
        )
        .bind(id)
        .bind(changes.username.as_deref())
        .bind(changes.password_hash.as_deref())
        .bind(changes.group.as_ref().into_option().map(|g| g.as_i16()))
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn soft_delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        lifecycle::soft_delete(&self.pool, ContentTable::AdminUser, id).await
    }

    pub async fn exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        lifecycle::exists(&self.pool, ContentTable::AdminUser, id).await
    }
}
