//! Banner entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{Banner, ContentStatus};

/// Database row mapping for the banner table.
#[derive(Debug, Clone, FromRow)]
pub struct BannerEntity {
    pub id: i64,
    pub title: String,
    pub link: String,
    pub img: String,
    pub platform: String,
    pub status: i16,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<BannerEntity> for Banner {
    fn from(entity: BannerEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            link: entity.link,
            img: entity.img,
            platform: entity.platform,
            status: ContentStatus::from_db(entity.status),
            create_time: entity.create_time,
            update_time: entity.update_time,
        }
    }
}
