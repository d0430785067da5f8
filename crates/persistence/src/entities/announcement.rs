//! Announcement entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{Announcement, ContentStatus};

/// Database row mapping for the announcement table.
#[derive(Debug, Clone, FromRow)]
pub struct AnnouncementEntity {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub target: String,
    pub platform: String,
    pub status: i16,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<AnnouncementEntity> for Announcement {
    fn from(entity: AnnouncementEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            content: entity.content,
            target: entity.target,
            platform: entity.platform,
            status: ContentStatus::from_db(entity.status),
            create_time: entity.create_time,
            update_time: entity.update_time,
        }
    }
}
