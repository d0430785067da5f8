//! Banner ("act") admin endpoints.

use std::path::Path;

use axum::extract::{Multipart, State};
use chrono::Utc;
use domain::models::banner::{
    image_id, AddBannerForm, BannerItem, BannerListResponse, DeleteBannerQuery,
    ModifyBannerRequest, NewBanner, PublishBannerRequest,
};
use domain::models::Banner;
use persistence::repositories::BannerRepository;
use shared::pagination::PageQuery;
use shared::validation::dedup_platforms;
use tracing::info;
use validator::Validate;

use super::AffectedResponse;
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AppJson, AppQuery};
use crate::jobs::{UploadJob, UploadKind};
use crate::middleware::AdminSession;
use crate::response::{ApiResponse, ApiResult, EmptyResult};
use crate::services::media::{read_upload_form, StagedFile};

fn banner_file_too_large() -> ApiError {
    ApiError::param("banner image exceeds the upload limit")
}

/// PUT /admin/act/addActAndFile
///
/// Multipart `title`, `content` (link), repeated `platform` and a required `file`.
/// One row per platform, each with its own copy of the image.
pub async fn add_banner(
    State(state): State<AppState>,
    session: AdminSession,
    multipart: Multipart,
) -> EmptyResult {
    let storage = &state.config.storage;
    let mut upload = read_upload_form(
        multipart,
        Path::new(&storage.upload_tmp_path),
        storage.max_upload_bytes,
        banner_file_too_large,
    )
    .await?;

    let form = AddBannerForm {
        title: upload.text("title").unwrap_or_default().to_string(),
        content: upload.text("content").unwrap_or_default().to_string(),
        platform: dedup_platforms(&upload.list("platform")),
    };
    form.validate()?;
    let image = upload
        .take_file()
        .ok_or_else(|| ApiError::param("banner image is required"))?;

    let mut rows = Vec::with_capacity(form.platform.len());
    let mut staged: Vec<StagedFile> = Vec::with_capacity(form.platform.len());
    for (i, platform) in form.platform.iter().enumerate() {
        let id = state.ids.next_id();
        rows.push(NewBanner {
            id,
            title: form.title.clone(),
            link: form.content.clone(),
            img: image_id(id, state.ids.next_id(), Utc::now()),
            platform: platform.clone(),
        });
        if i > 0 {
            staged.push(image.duplicate().await?);
        }
    }
    staged.insert(0, image);

    let repo = BannerRepository::new(state.pool.clone());
    repo.insert_batch(&rows).await?;

    for (row, file) in rows.iter().zip(staged) {
        state
            .uploads
            .enqueue(UploadJob::Put {
                kind: UploadKind::Image,
                key: state.urls.pic_key(&row.img),
                path: file.into_path(),
                on_failure: None,
            })
            .await;
    }

    info!(admin_id = session.admin_id, rows = rows.len(), "banners added");
    Ok(ApiResponse::empty())
}

/// GET /admin/act/getActs?page&size&platform
pub async fn list_banners(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> ApiResult<BannerListResponse> {
    let repo = BannerRepository::new(state.pool.clone());
    let page = query.pagination();
    let platform = query.platform_filter();

    let num = repo.count(platform).await?;
    let rows = repo.list(platform, page.limit(), page.offset()).await?;

    let act_list = rows
        .into_iter()
        .map(Banner::from)
        .map(|banner| {
            let url = state.urls.pic_url(&banner.img);
            BannerItem::new(banner, url)
        })
        .collect();

    Ok(ApiResponse::ok(BannerListResponse { act_list, num }))
}

/// PATCH /admin/act/chAct
pub async fn modify_banner(
    State(state): State<AppState>,
    AppJson(request): AppJson<ModifyBannerRequest>,
) -> EmptyResult {
    if request.actid <= 0 {
        return Err(ApiError::IdRequired);
    }
    request.validate()?;

    let (id, changes) = request.into_changes();
    let repo = BannerRepository::new(state.pool.clone());
    if repo.update(id, &changes).await? == 0 {
        return Err(ApiError::InvalidId);
    }

    Ok(ApiResponse::empty())
}

/// DELETE /admin/act/deleteAct?actid=
pub async fn delete_banner(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<DeleteBannerQuery>,
) -> EmptyResult {
    if query.actid <= 0 {
        return Err(ApiError::IdRequired);
    }

    let repo = BannerRepository::new(state.pool.clone());
    let banner: Banner = repo
        .find_by_id(query.actid)
        .await?
        .ok_or(ApiError::InvalidId)?
        .into();

    repo.soft_delete(banner.id).await?;

    if !banner.img.is_empty() {
        state
            .uploads
            .enqueue(UploadJob::Hide {
                key: state.urls.pic_key(&banner.img),
            })
            .await;
    }

    Ok(ApiResponse::empty())
}

/// POST /admin/act/publishAct
pub async fn publish_banners(
    State(state): State<AppState>,
    AppJson(request): AppJson<PublishBannerRequest>,
) -> ApiResult<AffectedResponse> {
    request.validate()?;

    let repo = BannerRepository::new(state.pool.clone());
    let affected = repo.publish(&request.actid).await?;

    Ok(ApiResponse::ok(AffectedResponse { affected }))
}
