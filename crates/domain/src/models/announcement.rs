//! Announcement ("notice") domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::patch::{validate_patch_api_status, validate_patch_platform, Patch};
use super::platform::default_platforms;
use super::status::ContentStatus;
use shared::datetime::format_datetime;
use shared::validation::{dedup_platforms, validate_id_list, validate_platform};

#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Audience the notice is addressed to.
    pub target: String,
    pub platform: String,
    pub status: ContentStatus,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub target: String,
    pub platform: String,
}

#[derive(Debug, Clone, Default)]
pub struct AnnouncementChanges {
    pub title: Patch<String>,
    pub content: Patch<String>,
    pub target: Patch<String>,
    pub platform: Patch<String>,
    pub status: Patch<ContentStatus>,
}

fn validate_optional_platforms(platforms: &[String]) -> Result<(), validator::ValidationError> {
    platforms.iter().try_for_each(|p| validate_platform(p))
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddAnnouncementRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub obj: String,
    /// Empty means every known platform.
    #[serde(default)]
    #[validate(custom(function = "validate_optional_platforms"))]
    pub platform: Vec<String>,
}

impl AddAnnouncementRequest {
    /// Target platforms for the fan-out.
    pub fn platforms(&self) -> Vec<String> {
        if self.platform.is_empty() {
            default_platforms()
        } else {
            dedup_platforms(&self.platform)
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ModifyAnnouncementRequest {
    pub newsid: i64,
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub content: Patch<String>,
    #[serde(default)]
    pub obj: Patch<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_patch_platform"))]
    pub platform: Patch<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_patch_api_status"))]
    pub status: Patch<i16>,
}

impl ModifyAnnouncementRequest {
    pub fn into_changes(self) -> (i64, AnnouncementChanges) {
        (
            self.newsid,
            AnnouncementChanges {
                title: self.title,
                content: self.content,
                target: self.obj,
                platform: self.platform,
                status: self.status.filter_map(ContentStatus::from_api_status),
            },
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteAnnouncementRequest {
    pub newsid: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PublishAnnouncementRequest {
    #[validate(custom(function = "validate_id_list"))]
    pub newsid: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementItem {
    pub newsid: i64,
    pub title: String,
    pub content: String,
    pub obj: String,
    pub status: i16,
    pub platform: String,
    pub update_time: String,
}

impl From<Announcement> for AnnouncementItem {
    fn from(a: Announcement) -> Self {
        Self {
            newsid: a.id,
            title: a.title,
            content: a.content,
            obj: a.target,
            status: a.status.api_status(),
            platform: a.platform,
            update_time: format_datetime(a.update_time),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementListResponse {
    pub notices: Vec<AnnouncementItem>,
    pub num: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedAnnouncement {
    pub newsid: i64,
    pub title: String,
    pub content: String,
    pub obj: String,
    pub update_time: String,
}

impl From<Announcement> for PublishedAnnouncement {
    fn from(a: Announcement) -> Self {
        Self {
            newsid: a.id,
            title: a.title,
            content: a.content,
            obj: a.target,
            update_time: format_datetime(a.update_time),
        }
    }
}
