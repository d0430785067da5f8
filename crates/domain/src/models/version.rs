//! App release ("version") domain model.
//!
//! Unlike other content, at most one version per platform is published at a time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::patch::Patch;
use super::status::ContentStatus;
use shared::datetime::format_datetime;
use shared::validation::{validate_not_blank, validate_platform};

#[derive(Debug, Clone, PartialEq)]
pub struct Version {
    pub id: i64,
    pub version_text: String,
    pub summary: String,
    /// Object key below the version base path; empty when no file was uploaded.
    pub file: String,
    pub platform: String,
    pub status: ContentStatus,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl Version {
    pub fn has_file(&self) -> bool {
        !self.file.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct NewVersion {
    pub id: i64,
    pub version_text: String,
    pub summary: String,
    pub file: String,
    pub platform: String,
}

#[derive(Debug, Clone, Default)]
pub struct VersionChanges {
    pub version_text: Patch<String>,
    pub summary: Patch<String>,
    pub file: Patch<String>,
    pub platform: Patch<String>,
}

/// Text fields of the multipart `add` form.
#[derive(Debug, Clone, Default, Validate)]
pub struct AddVersionForm {
    #[validate(custom(function = "validate_not_blank"))]
    pub version: String,
    pub update_content: String,
    #[validate(custom(function = "validate_platform"))]
    pub platform: String,
}

/// Text fields of the multipart `update` form.
#[derive(Debug, Clone, Default)]
pub struct ModifyVersionForm {
    pub id: i64,
    pub version: Patch<String>,
    pub update_content: Patch<String>,
    pub platform: Patch<String>,
}

impl ModifyVersionForm {
    pub fn validate_fields(&self) -> Result<(), validator::ValidationError> {
        if self.id <= 0 {
            let mut err = validator::ValidationError::new("id");
            err.message = Some("id is required".into());
            return Err(err);
        }
        if let Patch::Set(version) = &self.version {
            validate_not_blank(version)?;
        }
        if let Patch::Set(platform) = &self.platform {
            validate_platform(platform)?;
        }
        Ok(())
    }

    pub fn into_changes(self) -> (i64, VersionChanges) {
        (
            self.id,
            VersionChanges {
                version_text: self.version,
                summary: self.update_content,
                file: Patch::Unchanged,
                platform: self.platform,
            },
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteVersionQuery {
    pub id: i64,
}

/// `platform` is accepted for compatibility; the stored platform of `id` decides.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishVersionRequest {
    pub id: i64,
    #[serde(default)]
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionItem {
    pub id: i64,
    pub version: String,
    pub update_content: String,
    pub apk_url: String,
    pub status: i16,
    pub platform: String,
    pub create_time: String,
}

impl VersionItem {
    pub fn new(version: Version, apk_url: String) -> Self {
        Self {
            id: version.id,
            version: version.version_text,
            update_content: version.summary,
            apk_url,
            status: version.status.api_status(),
            platform: version.platform,
            create_time: format_datetime(version.create_time),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionListResponse {
    pub version_controls: Vec<VersionItem>,
    pub num: i64,
}

/// Public "latest release" payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestVersion {
    pub version: String,
    pub update_content: String,
    pub apk_url: String,
}

impl LatestVersion {
    pub fn new(version: Version, apk_url: String) -> Self {
        Self {
            version: version.version_text,
            update_content: version.summary,
            apk_url,
        }
    }
}

/// Object key layout below the version base path: `{uniqueId}/{fileName}`.
pub fn file_key(unique_id: i64, file_name: &str) -> String {
    format!("{}/{}", unique_id, file_name)
}
