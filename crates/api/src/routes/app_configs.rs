//! Feature-flag ("config") admin endpoints.

use axum::extract::State;
use domain::models::app_config::{
    bool_options, AddConfigRequest, ConfigItem, ConfigListQuery, ConfigListResponse,
    DeleteConfigQuery, ModifyConfigRequest, NewAppConfig, PlatformListResponse,
};
use domain::models::{AppConfig, Patch};
use persistence::repositories::AppConfigRepository;
use shared::validation::dedup_platforms;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AppJson, AppQuery};
use crate::middleware::AdminSession;
use crate::response::{ApiResponse, ApiResult, EmptyResult};

/// GET /admin/config/getAllConfig?platform
pub async fn list_configs(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ConfigListQuery>,
) -> ApiResult<ConfigListResponse> {
    let platform = query
        .platform
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());

    let repo = AppConfigRepository::new(state.pool.clone());
    let num = repo.count(platform).await?;
    let configs = repo
        .list(platform)
        .await?
        .into_iter()
        .map(|entity| ConfigItem::from(AppConfig::from(entity)))
        .collect();

    Ok(ApiResponse::ok(ConfigListResponse { configs, num }))
}

/// PUT /admin/config/addConfig
pub async fn add_config(
    State(state): State<AppState>,
    session: AdminSession,
    AppJson(request): AppJson<AddConfigRequest>,
) -> EmptyResult {
    request.validate()?;

    let value_type = request.value_type();
    let possible_values = request.possible_values();
    let rows: Vec<NewAppConfig> = dedup_platforms(&request.platform)
        .into_iter()
        .map(|platform| NewAppConfig {
            id: state.ids.next_id(),
            name: request.setting_name.trim().to_string(),
            value: request.current_setting.clone(),
            possible_values: possible_values.clone(),
            value_type,
            describe: request.content.clone(),
            platform,
        })
        .collect();

    let repo = AppConfigRepository::new(state.pool.clone());
    repo.insert_batch(&rows).await?;

    info!(
        admin_id = session.admin_id,
        name = %request.setting_name,
        rows = rows.len(),
        "config added"
    );
    Ok(ApiResponse::empty())
}

/// PATCH /admin/config/chConfig
///
/// Bool configs only take `"true"`/`"false"` and keep their fixed option list.
pub async fn modify_config(
    State(state): State<AppState>,
    AppJson(request): AppJson<ModifyConfigRequest>,
) -> EmptyResult {
    if request.config_id <= 0 {
        return Err(ApiError::IdRequired);
    }
    request.validate()?;

    let repo = AppConfigRepository::new(state.pool.clone());
    let existing: AppConfig = repo
        .find_by_id(request.config_id)
        .await?
        .ok_or(ApiError::InvalidId)?
        .into();

    let (id, mut changes) = request.into_changes();
    if existing.is_bool() {
        if let Patch::Set(value) = &changes.value {
            if value != "true" && value != "false" {
                return Err(ApiError::param("bool configs take \"true\" or \"false\""));
            }
        }
        if changes.possible_values.is_set() {
            changes.possible_values = Patch::Set(bool_options());
        }
    }

    if repo.update(id, &changes).await? == 0 {
        return Err(ApiError::InvalidId);
    }

    Ok(ApiResponse::empty())
}

/// DELETE /admin/config/deleteConfig?configId=
pub async fn delete_config(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<DeleteConfigQuery>,
) -> EmptyResult {
    if query.config_id <= 0 {
        return Err(ApiError::IdRequired);
    }

    let repo = AppConfigRepository::new(state.pool.clone());
    if repo.soft_delete(query.config_id).await? == 0 {
        return Err(ApiError::DeleteFailed);
    }

    Ok(ApiResponse::empty())
}

/// GET /admin/config/getAllPlatform
pub async fn list_platforms(State(state): State<AppState>) -> ApiResult<PlatformListResponse> {
    let repo = AppConfigRepository::new(state.pool.clone());
    let platform = repo.list_platforms().await?;
    Ok(ApiResponse::ok(PlatformListResponse { platform }))
}
