//! Admin user entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{AdminGroup, AdminUser, ContentStatus};

/// Database row mapping for the admin_user table.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUserEntity {
    pub id: i64,
    pub username: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub group_id: i16,
    pub status: i16,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<AdminUserEntity> for AdminUser {
    fn from(entity: AdminUserEntity) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
            password_hash: entity.password_hash,
            // Unknown groups get the least privilege.
            group: AdminGroup::from_i16(entity.group_id).unwrap_or(AdminGroup::NormalAdmin),
            status: ContentStatus::from_db(entity.status),
            create_time: entity.create_time,
            update_time: entity.update_time,
        }
    }
}
