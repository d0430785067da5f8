//! Client-facing read endpoints under `/wusthelper`.
//!
//! No token is needed; clients identify their platform with the `Platform` header.

use axum::extract::State;
use domain::models::announcement::PublishedAnnouncement;
use domain::models::banner::PublishedBanner;
use domain::models::changelog::PublishedChangelog;
use domain::models::version::LatestVersion;
use domain::models::{Announcement, AppConfig, Banner, Changelog, Term, Version};
use domain::services::{
    build_public_config, ConfigLayout, PublicConfigInput, ReleaseInfo, TermDateStyle,
};
use persistence::repositories::{
    AnnouncementRepository, AppConfigRepository, BannerRepository, ChangelogRepository,
    TermRepository, VersionRepository,
};
use serde_json::{Map, Value};

use crate::app::AppState;
use crate::extractors::{PlatformHeader, RequiredPlatform};
use crate::response::{ApiResponse, ApiResult};

/// GET /wusthelper/notice
pub async fn published_announcements(
    State(state): State<AppState>,
    PlatformHeader(platform): PlatformHeader,
) -> ApiResult<Vec<PublishedAnnouncement>> {
    let repo = AnnouncementRepository::new(state.pool.clone());
    let notices = repo
        .list_published(platform.as_deref())
        .await?
        .into_iter()
        .map(|entity| PublishedAnnouncement::from(Announcement::from(entity)))
        .collect();
    Ok(ApiResponse::ok(notices))
}

/// GET /wusthelper/act
///
/// `actid` in the payload is the display position.
pub async fn published_banners(
    State(state): State<AppState>,
    PlatformHeader(platform): PlatformHeader,
) -> ApiResult<Vec<PublishedBanner>> {
    let repo = BannerRepository::new(state.pool.clone());
    let banners = repo
        .list_published(platform.as_deref())
        .await?
        .into_iter()
        .map(Banner::from)
        .enumerate()
        .map(|(position, banner)| {
            let url = state.urls.pic_url(&banner.img);
            PublishedBanner::new(position, banner, url)
        })
        .collect();
    Ok(ApiResponse::ok(banners))
}

/// GET /wusthelper/log
pub async fn published_changelogs(
    State(state): State<AppState>,
    PlatformHeader(platform): PlatformHeader,
) -> ApiResult<Vec<PublishedChangelog>> {
    let repo = ChangelogRepository::new(state.pool.clone());
    let logs = repo
        .list_published(platform.as_deref())
        .await?
        .into_iter()
        .map(|entity| PublishedChangelog::from(Changelog::from(entity)))
        .collect();
    Ok(ApiResponse::ok(logs))
}

async fn find_latest(state: &AppState, platform: &str) -> Result<Option<Version>, sqlx::Error> {
    let repo = VersionRepository::new(state.pool.clone());
    Ok(repo.find_latest_published(platform).await?.map(Version::from))
}

/// GET /wusthelper/version
///
/// `data` is `null` while nothing is published for the platform.
pub async fn latest_version(
    State(state): State<AppState>,
    RequiredPlatform(platform): RequiredPlatform,
) -> ApiResult<Option<LatestVersion>> {
    let latest = find_latest(&state, &platform).await?.map(|version| {
        let url = state.urls.file_url(&version.file);
        LatestVersion::new(version, url)
    });
    Ok(ApiResponse::ok(latest))
}

/// GET /wusthelper/config
pub async fn public_config(
    State(state): State<AppState>,
    RequiredPlatform(platform): RequiredPlatform,
) -> ApiResult<Map<String, Value>> {
    let configs: Vec<AppConfig> = AppConfigRepository::new(state.pool.clone())
        .list(Some(&platform))
        .await?
        .into_iter()
        .map(AppConfig::from)
        .collect();

    let terms: Vec<Term> = TermRepository::new(state.pool.clone())
        .list()
        .await?
        .into_iter()
        .map(Term::from)
        .collect();

    let release = find_latest(&state, &platform).await?.map(|version| ReleaseInfo {
        apk_url: state.urls.file_url(&version.file),
        version: version.version_text,
        update_content: version.summary,
    });

    let payload = build_public_config(PublicConfigInput {
        layout: ConfigLayout::for_platform(&platform),
        term_dates: TermDateStyle::for_platform(&platform),
        configs: &configs,
        release,
        terms: &terms,
    });

    Ok(ApiResponse::ok(payload))
}
