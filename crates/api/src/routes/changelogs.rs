//! Changelog ("log") admin endpoints.

use axum::extract::State;
use domain::models::changelog::{
    AddChangelogRequest, ChangelogItem, ChangelogListResponse, DeleteChangelogQuery,
    ModifyChangelogRequest, NewChangelog, PublishChangelogRequest, ServiceVersion,
};
use domain::models::Changelog;
use persistence::repositories::ChangelogRepository;
use shared::datetime::format_datetime;
use shared::pagination::PageQuery;
use shared::validation::dedup_platforms;
use tracing::info;
use validator::Validate;

use super::AffectedResponse;
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AppJson, AppQuery};
use crate::middleware::AdminSession;
use crate::response::{ApiResponse, ApiResult, EmptyResult};

/// PUT /admin/log/addLog
pub async fn add_changelog(
    State(state): State<AppState>,
    session: AdminSession,
    AppJson(request): AppJson<AddChangelogRequest>,
) -> EmptyResult {
    request.validate()?;

    let rows: Vec<NewChangelog> = dedup_platforms(&request.platform)
        .into_iter()
        .map(|platform| NewChangelog {
            id: state.ids.next_id(),
            title: request.title.clone(),
            content: request.content.clone(),
            version_text: request.version.trim().to_string(),
            platform,
        })
        .collect();

    let repo = ChangelogRepository::new(state.pool.clone());
    repo.insert_batch(&rows).await?;

    info!(admin_id = session.admin_id, version = %request.version, "changelog added");
    Ok(ApiResponse::empty())
}

/// GET /admin/log/getLog?page&size&platform
pub async fn list_changelogs(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> ApiResult<ChangelogListResponse> {
    let repo = ChangelogRepository::new(state.pool.clone());
    let page = query.pagination();
    let platform = query.platform_filter();

    let num = repo.count(platform).await?;
    let logs = repo
        .list(platform, page.limit(), page.offset())
        .await?
        .into_iter()
        .map(|entity| ChangelogItem::from(Changelog::from(entity)))
        .collect();

    Ok(ApiResponse::ok(ChangelogListResponse { logs, num }))
}

/// PATCH /admin/log/chLog
pub async fn modify_changelog(
    State(state): State<AppState>,
    AppJson(request): AppJson<ModifyChangelogRequest>,
) -> EmptyResult {
    if request.logid <= 0 {
        return Err(ApiError::IdRequired);
    }
    request.validate()?;

    let (id, changes) = request.into_changes();
    let repo = ChangelogRepository::new(state.pool.clone());
    if repo.update(id, &changes).await? == 0 {
        return Err(ApiError::LogNotFound);
    }

    Ok(ApiResponse::empty())
}

/// DELETE /admin/log/deleteLog?logid=
pub async fn delete_changelog(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<DeleteChangelogQuery>,
) -> EmptyResult {
    if query.logid <= 0 {
        return Err(ApiError::IdRequired);
    }

    let repo = ChangelogRepository::new(state.pool.clone());
    if repo.soft_delete(query.logid).await? == 0 {
        return Err(ApiError::LogNotFound);
    }

    Ok(ApiResponse::empty())
}

/// POST /admin/log/publishLog
pub async fn publish_changelogs(
    State(state): State<AppState>,
    AppJson(request): AppJson<PublishChangelogRequest>,
) -> ApiResult<AffectedResponse> {
    request.validate()?;

    let repo = ChangelogRepository::new(state.pool.clone());
    let affected = repo.publish(&request.logid).await?;

    Ok(ApiResponse::ok(AffectedResponse { affected }))
}

/// GET /admin/log/getVersion
pub async fn service_version(State(state): State<AppState>) -> ApiResult<ServiceVersion> {
    Ok(ApiResponse::ok(ServiceVersion {
        version: env!("CARGO_PKG_VERSION").to_string(),
        time: format_datetime(state.boot_time),
    }))
}
