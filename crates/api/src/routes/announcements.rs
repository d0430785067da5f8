//! Announcement ("notice") admin endpoints.

use axum::extract::State;
use domain::models::announcement::{
    AddAnnouncementRequest, AnnouncementItem, AnnouncementListResponse,
    DeleteAnnouncementRequest, ModifyAnnouncementRequest, NewAnnouncement,
    PublishAnnouncementRequest,
};
use domain::models::Announcement;
use persistence::repositories::AnnouncementRepository;
use shared::pagination::PageQuery;
use tracing::{error, info};
use validator::Validate;

use super::AffectedResponse;
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AppJson, AppQuery};
use crate::middleware::AdminSession;
use crate::response::{ApiResponse, ApiResult, EmptyResult};

/// PUT /admin/notice/addNotice
///
/// One row per target platform; an empty platform list targets every platform.
pub async fn add_announcement(
    State(state): State<AppState>,
    session: AdminSession,
    AppJson(request): AppJson<AddAnnouncementRequest>,
) -> EmptyResult {
    if request.title.trim().is_empty() && request.content.trim().is_empty() {
        return Err(ApiError::ContentEmpty);
    }
    request.validate()?;

    let rows: Vec<NewAnnouncement> = request
        .platforms()
        .into_iter()
        .map(|platform| NewAnnouncement {
            id: state.ids.next_id(),
            title: request.title.clone(),
            content: request.content.clone(),
            target: request.obj.clone(),
            platform,
        })
        .collect();

    let repo = AnnouncementRepository::new(state.pool.clone());
    repo.insert_batch(&rows).await?;

    info!(admin_id = session.admin_id, rows = rows.len(), "announcements added");
    Ok(ApiResponse::empty())
}

/// GET /admin/notice/getNotice?page&size&platform
pub async fn list_announcements(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> ApiResult<AnnouncementListResponse> {
    let repo = AnnouncementRepository::new(state.pool.clone());
    let page = query.pagination();
    let platform = query.platform_filter();

    let num = repo.count(platform).await?;
    let notices = repo
        .list(platform, page.limit(), page.offset())
        .await?
        .into_iter()
        .map(|entity| AnnouncementItem::from(Announcement::from(entity)))
        .collect();

    Ok(ApiResponse::ok(AnnouncementListResponse { notices, num }))
}

/// PATCH /admin/notice/chNotice
pub async fn modify_announcement(
    State(state): State<AppState>,
    AppJson(request): AppJson<ModifyAnnouncementRequest>,
) -> EmptyResult {
    if request.newsid <= 0 {
        return Err(ApiError::IdRequired);
    }
    request.validate()?;

    let (id, changes) = request.into_changes();
    let repo = AnnouncementRepository::new(state.pool.clone());
    if repo.update(id, &changes).await? == 0 {
        return Err(ApiError::InvalidId);
    }

    Ok(ApiResponse::empty())
}

/// DELETE /admin/notice/deleteNotice
pub async fn delete_announcement(
    State(state): State<AppState>,
    AppJson(request): AppJson<DeleteAnnouncementRequest>,
) -> EmptyResult {
    if request.newsid <= 0 {
        return Err(ApiError::IdRequired);
    }

    let repo = AnnouncementRepository::new(state.pool.clone());
    if repo.soft_delete(request.newsid).await? == 0 {
        return Err(ApiError::DeleteFailed);
    }

    Ok(ApiResponse::empty())
}

/// POST /admin/notice/publishNotice
pub async fn publish_announcements(
    State(state): State<AppState>,
    AppJson(request): AppJson<PublishAnnouncementRequest>,
) -> ApiResult<AffectedResponse> {
    request.validate()?;

    let repo = AnnouncementRepository::new(state.pool.clone());
    let affected = repo.publish(&request.newsid).await.map_err(|e| {
        error!(error = %e, "announcement publish failed");
        ApiError::AnnouncementPublishFailed
    })?;

    Ok(ApiResponse::ok(AffectedResponse { affected }))
}
