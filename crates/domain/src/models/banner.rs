//! Banner ("act") domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::patch::{validate_patch_api_status, validate_patch_platform, Patch};
use super::status::ContentStatus;
use shared::datetime::format_datetime;
use shared::validation::{validate_id_list, validate_platform_list};

/// A home-screen banner for one platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub id: i64,
    pub title: String,
    pub link: String,
    /// Image id; empty when the banner has no picture.
    pub img: String,
    pub platform: String,
    pub status: ContentStatus,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

/// Row to insert; one per target platform.
#[derive(Debug, Clone)]
pub struct NewBanner {
    pub id: i64,
    pub title: String,
    pub link: String,
    pub img: String,
    pub platform: String,
}

/// Partial update of a banner.
#[derive(Debug, Clone, Default)]
pub struct BannerChanges {
    pub title: Patch<String>,
    pub link: Patch<String>,
    pub img: Patch<String>,
    pub platform: Patch<String>,
    pub status: Patch<ContentStatus>,
}

/// Text fields of the multipart `addActAndFile` form.
#[derive(Debug, Clone, Default, Validate)]
pub struct AddBannerForm {
    pub title: String,
    pub content: String,
    #[validate(custom(function = "validate_platform_list"))]
    pub platform: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ModifyBannerRequest {
    pub actid: i64,
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub content: Patch<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_patch_platform"))]
    pub platform: Patch<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_patch_api_status"))]
    pub status: Patch<i16>,
}

impl ModifyBannerRequest {
    pub fn into_changes(self) -> (i64, BannerChanges) {
        (
            self.actid,
            BannerChanges {
                title: self.title,
                link: self.content,
                img: Patch::Unchanged,
                platform: self.platform,
                status: self.status.filter_map(ContentStatus::from_api_status),
            },
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteBannerQuery {
    pub actid: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PublishBannerRequest {
    #[validate(custom(function = "validate_id_list"))]
    pub actid: Vec<i64>,
    #[serde(default)]
    pub platform: Option<String>,
}

/// Admin list row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerItem {
    pub actid: i64,
    pub title: String,
    pub content: String,
    pub img_url: String,
    pub status: i16,
    pub platform: String,
    pub update_time: String,
}

impl BannerItem {
    pub fn new(banner: Banner, img_url: String) -> Self {
        Self {
            actid: banner.id,
            title: banner.title,
            content: banner.link,
            img_url,
            status: banner.status.api_status(),
            platform: banner.platform,
            update_time: format_datetime(banner.update_time),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerListResponse {
    pub act_list: Vec<BannerItem>,
    pub num: i64,
}

/// Public row; `actid` is the display position, not the row id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedBanner {
    pub actid: usize,
    pub title: String,
    pub content: String,
    pub img_url: String,
    pub update_time: String,
}

impl PublishedBanner {
    pub fn new(position: usize, banner: Banner, img_url: String) -> Self {
        Self {
            actid: position,
            title: banner.title,
            content: banner.link,
            img_url,
            update_time: format_datetime(banner.update_time),
        }
    }
}

/// Image id layout: `{bannerId}/v1.{uniqueId}.{millis}`.
pub fn image_id(banner_id: i64, unique_id: i64, at: DateTime<Utc>) -> String {
    format!("{}/v1.{}.{}", banner_id, unique_id, at.timestamp_millis())
}
