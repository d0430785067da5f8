//! Changelog entity (row of the `log` table).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{Changelog, ContentStatus};

#[derive(Debug, Clone, FromRow)]
pub struct ChangelogEntity {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub version_text: String,
    pub platform: String,
    pub status: i16,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<ChangelogEntity> for Changelog {
    fn from(entity: ChangelogEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            content: entity.content,
            version_text: entity.version_text,
            platform: entity.platform,
            status: ContentStatus::from_db(entity.status),
            create_time: entity.create_time,
            update_time: entity.update_time,
        }
    }
}
