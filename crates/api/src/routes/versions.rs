//! App release ("version") admin endpoints.
//!
//! Release files go through the upload queue; the row is committed first and the
//! worker clears the file column again if the upload fails.

use std::path::Path;

use axum::extract::{Multipart, State};
use domain::models::version::{
    file_key, AddVersionForm, DeleteVersionQuery, ModifyVersionForm, NewVersion,
    PublishVersionRequest, VersionItem, VersionListResponse,
};
use domain::models::{Patch, Version};
use persistence::repositories::VersionRepository;
use shared::pagination::PageQuery;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AppJson, AppQuery};
use crate::jobs::{FailureAction, UploadJob, UploadKind};
use crate::middleware::AdminSession;
use crate::response::{ApiResponse, ApiResult, EmptyResult};
use crate::services::media::{read_upload_form, StagedFile, UploadForm};

fn version_file_too_large() -> ApiError {
    ApiError::VersionOperationFailed
}

async fn read_version_form(state: &AppState, multipart: Multipart) -> Result<UploadForm, ApiError> {
    let storage = &state.config.storage;
    read_upload_form(
        multipart,
        Path::new(&storage.upload_tmp_path),
        storage.max_upload_bytes,
        version_file_too_large,
    )
    .await
}

/// Present text parts become `Patch::Set`, absent ones stay unchanged.
fn patch_text(form: &UploadForm, name: &str) -> Patch<String> {
    form.text(name).map(str::to_string).into()
}

/// Queues the upload of a staged release file; on failure the worker detaches it
/// from version `id` again.
async fn enqueue_release_file(state: &AppState, id: i64, key: &str, file: StagedFile) {
    state
        .uploads
        .enqueue(UploadJob::Put {
            kind: UploadKind::File,
            key: state.urls.file_key(key),
            path: file.into_path(),
            on_failure: Some(FailureAction::ClearVersionFile {
                id,
                file: key.to_string(),
            }),
        })
        .await;
}

async fn hide_release_file(state: &AppState, key: &str) {
    if key.is_empty() {
        return;
    }
    state
        .uploads
        .enqueue(UploadJob::Hide {
            key: state.urls.file_key(key),
        })
        .await;
}

/// GET /admin/version/getAll?page&size&platform
pub async fn list_versions(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> ApiResult<VersionListResponse> {
    let repo = VersionRepository::new(state.pool.clone());
    let page = query.pagination();
    let platform = query.platform_filter();

    let num = repo.count(platform).await?;
    let version_controls = repo
        .list(platform, page.limit(), page.offset())
        .await?
        .into_iter()
        .map(Version::from)
        .map(|version| {
            let url = state.urls.file_url(&version.file);
            VersionItem::new(version, url)
        })
        .collect();

    Ok(ApiResponse::ok(VersionListResponse {
        version_controls,
        num,
    }))
}

/// PUT /admin/version/add
///
/// Multipart `version`, `updateContent`, `platform` and an optional `file`.
pub async fn add_version(
    State(state): State<AppState>,
    session: AdminSession,
    multipart: Multipart,
) -> EmptyResult {
    let mut upload = read_version_form(&state, multipart).await?;

    let form = AddVersionForm {
        version: upload.text("version").unwrap_or_default().trim().to_string(),
        update_content: upload.text("updateContent").unwrap_or_default().to_string(),
        platform: upload.text("platform").unwrap_or_default().trim().to_string(),
    };
    form.validate()?;

    let file = upload.take_file();
    let key = file
        .as_ref()
        .map(|f| file_key(state.ids.next_id(), f.file_name()))
        .unwrap_or_default();

    let row = NewVersion {
        id: state.ids.next_id(),
        version_text: form.version,
        summary: form.update_content,
        file: key.clone(),
        platform: form.platform,
    };

    let repo = VersionRepository::new(state.pool.clone());
    repo.insert(&row).await?;

    if let Some(file) = file {
        enqueue_release_file(&state, row.id, &key, file).await;
    }

    info!(
        admin_id = session.admin_id,
        version_id = row.id,
        version = %row.version_text,
        platform = %row.platform,
        "version added"
    );
    Ok(ApiResponse::empty())
}

/// PATCH /admin/version/update
///
/// Multipart `id` plus any of `version`, `updateContent`, `platform`, `file`. A new
/// file replaces the old one, which is hidden.
pub async fn modify_version(
    State(state): State<AppState>,
    multipart: Multipart,
) -> EmptyResult {
    let mut upload = read_version_form(&state, multipart).await?;

    let id = match upload.text("id").map(str::trim) {
        None | Some("") => return Err(ApiError::IdRequired),
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| ApiError::param(format!("id is not a number: {}", raw)))?,
    };
    if id <= 0 {
        return Err(ApiError::IdRequired);
    }

    let form = ModifyVersionForm {
        id,
        version: patch_text(&upload, "version").map(|v| v.trim().to_string()),
        update_content: patch_text(&upload, "updateContent"),
        platform: patch_text(&upload, "platform").map(|p| p.trim().to_string()),
    };
    form.validate_fields()?;
    let (id, mut changes) = form.into_changes();

    let repo = VersionRepository::new(state.pool.clone());

    let Some(file) = upload.take_file() else {
        if repo.update(id, &changes).await? == 0 {
            return Err(ApiError::VersionOperationFailed);
        }
        return Ok(ApiResponse::empty());
    };

    let existing: Version = repo
        .find_by_id(id)
        .await?
        .ok_or(ApiError::VersionOperationFailed)?
        .into();

    let key = file_key(state.ids.next_id(), file.file_name());
    changes.file = Patch::Set(key.clone());
    if repo.update(id, &changes).await? == 0 {
        return Err(ApiError::VersionOperationFailed);
    }

    hide_release_file(&state, &existing.file).await;
    enqueue_release_file(&state, id, &key, file).await;

    Ok(ApiResponse::empty())
}

/// DELETE /admin/version/delete?id=
pub async fn delete_version(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<DeleteVersionQuery>,
) -> EmptyResult {
    if query.id <= 0 {
        return Err(ApiError::IdRequired);
    }

    let repo = VersionRepository::new(state.pool.clone());
    let existing: Version = repo
        .find_by_id(query.id)
        .await?
        .ok_or(ApiError::VersionOperationFailed)?
        .into();

    repo.soft_delete(existing.id).await?;
    hide_release_file(&state, &existing.file).await;

    Ok(ApiResponse::empty())
}

/// POST /admin/version/publish
///
/// Makes `id` the only published version of its platform and points the stable
/// release key at its file.
pub async fn publish_version(
    State(state): State<AppState>,
    session: AdminSession,
    AppJson(request): AppJson<PublishVersionRequest>,
) -> EmptyResult {
    if request.id <= 0 {
        return Err(ApiError::IdRequired);
    }

    let repo = VersionRepository::new(state.pool.clone());
    let published: Version = repo
        .publish(request.id)
        .await?
        .ok_or(ApiError::QueryFailed)?
        .into();

    if published.has_file() {
        state
            .uploads
            .enqueue(UploadJob::Symlink {
                link_key: state.config.storage.release_file_key.clone(),
                target_key: state.urls.file_key(&published.file),
            })
            .await;
    }

    info!(
        admin_id = session.admin_id,
        version_id = published.id,
        platform = %published.platform,
        "version published"
    );
    Ok(ApiResponse::empty())
}
