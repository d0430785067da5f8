//! Term entity (row of the `terms` table).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use domain::models::{ContentStatus, Term};

#[derive(Debug, Clone, FromRow)]
pub struct TermEntity {
    pub id: i64,
    pub term: String,
    pub start: NaiveDate,
    pub status: i16,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<TermEntity> for Term {
    fn from(entity: TermEntity) -> Self {
        Self {
            id: entity.id,
            term: entity.term,
            start_date: entity.start,
            status: ContentStatus::from_db(entity.status),
            create_time: entity.create_time,
            update_time: entity.update_time,
        }
    }
}
