//! Config entity (row of the `config` table).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{AppConfig, ConfigValueType, ContentStatus};

/// Database row mapping for the config table.
#[derive(Debug, Clone, FromRow)]
pub struct AppConfigEntity {
    pub id: i64,
    pub name: String,
    pub value: String,
    pub possible_values: Vec<String>, // TEXT[]
    #[sqlx(rename = "type")]
    pub value_type: i16,
    pub describe: String,
    pub platform: String,
    pub status: i16,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<AppConfigEntity> for AppConfig {
    fn from(entity: AppConfigEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            value: entity.value,
            possible_values: entity.possible_values,
            value_type: ConfigValueType::from_i16(entity.value_type),
            describe: entity.describe,
            platform: entity.platform,
            status: ContentStatus::from_db(entity.status),
            create_time: entity.create_time,
            update_time: entity.update_time,
        }
    }
}
