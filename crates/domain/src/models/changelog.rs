//! Changelog ("log") domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::patch::{validate_patch_api_status, validate_patch_not_blank, validate_patch_platform, Patch};
use super::status::ContentStatus;
use shared::datetime::{format_date, format_datetime};
use shared::validation::{validate_id_list, validate_not_blank, validate_platform_list};

#[derive(Debug, Clone, PartialEq)]
pub struct Changelog {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub version_text: String,
    pub platform: String,
    pub status: ContentStatus,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewChangelog {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub version_text: String,
    pub platform: String,
}

#[derive(Debug, Clone, Default)]
pub struct ChangelogChanges {
    pub title: Patch<String>,
    pub content: Patch<String>,
    pub version_text: Patch<String>,
    pub platform: Patch<String>,
    pub status: Patch<ContentStatus>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddChangelogRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub version: String,
    #[validate(custom(function = "validate_platform_list"))]
    pub platform: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ModifyChangelogRequest {
    pub logid: i64,
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub content: Patch<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_patch_not_blank"))]
    pub version: Patch<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_patch_platform"))]
    pub platform: Patch<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_patch_api_status"))]
    pub status: Patch<i16>,
}

impl ModifyChangelogRequest {
    pub fn into_changes(self) -> (i64, ChangelogChanges) {
        (
            self.logid,
            ChangelogChanges {
                title: self.title,
                content: self.content,
                version_text: self.version,
                platform: self.platform,
                status: self.status.filter_map(ContentStatus::from_api_status),
            },
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteChangelogQuery {
    pub logid: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PublishChangelogRequest {
    #[validate(custom(function = "validate_id_list"))]
    pub logid: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangelogItem {
    pub logid: i64,
    pub title: String,
    pub content: String,
    pub version: String,
    pub status: i16,
    pub platform: String,
    /// Date only.
    pub update_time: String,
}

impl From<Changelog> for ChangelogItem {
    fn from(log: Changelog) -> Self {
        Self {
            logid: log.id,
            title: log.title,
            content: log.content,
            version: log.version_text,
            status: log.status.api_status(),
            platform: log.platform,
            update_time: format_date(log.update_time),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangelogListResponse {
    pub logs: Vec<ChangelogItem>,
    pub num: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedChangelog {
    pub logid: i64,
    pub title: String,
    pub content: String,
    pub version: String,
    pub create_time: String,
}

impl From<Changelog> for PublishedChangelog {
    fn from(log: Changelog) -> Self {
        Self {
            logid: log.id,
            title: log.title,
            content: log.content,
            version: log.version_text,
            create_time: format_datetime(log.create_time),
        }
    }
}

/// Build information reported by `getVersion`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceVersion {
    pub version: String,
    pub time: String,
}
