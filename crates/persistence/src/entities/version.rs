//! Version entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{ContentStatus, Version};

/// Database row mapping for the version table.
#[derive(Debug, Clone, FromRow)]
pub struct VersionEntity {
    pub id: i64,
    pub version_text: String,
    pub summary: String,
    pub file: String,
    pub platform: String,
    pub status: i16,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<VersionEntity> for Version {
    fn from(entity: VersionEntity) -> Self {
        Self {
            id: entity.id,
            version_text: entity.version_text,
            summary: entity.summary,
            file: entity.file,
            platform: entity.platform,
            status: ContentStatus::from_db(entity.status),
            create_time: entity.create_time,
            update_time: entity.update_time,
        }
    }
}
