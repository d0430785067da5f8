//! Admin login and account management.
//!
//! Account changes are checked against the acting admin's current row, not the group
//! baked into the token, so a demoted admin loses rights before the token expires.

use axum::extract::State;
use domain::models::admin_user::{
    AddAdminRequest, AdminUserChanges, AdminUserItem, DeleteAdminRequest, LoginRequest,
    LoginResponse, ModifyAdminRequest, NewAdminUser,
};
use domain::models::{AdminGroup, AdminUser, Patch};
use persistence::repositories::AdminUserRepository;
use shared::password::{hash_password, verify_password};
use tracing::{info, warn};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AppJson;
use crate::middleware::AdminSession;
use crate::response::{ApiResponse, ApiResult, EmptyResult};

fn hash(password: &str) -> Result<String, ApiError> {
    hash_password(password).map_err(|e| ApiError::Internal(format!("password hashing: {}", e)))
}

/// Loads the acting admin and requires the super admin group.
async fn require_super_admin(
    repo: &AdminUserRepository,
    session: &AdminSession,
) -> Result<AdminUser, ApiError> {
    let actor: AdminUser = repo
        .find_by_id(session.admin_id)
        .await?
        .ok_or(ApiError::NotAuthorized)?
        .into();

    if !actor.group.is_super() {
        warn!(admin_id = actor.id, "account change refused, not a super admin");
        return Err(ApiError::PermissionDenied);
    }
    Ok(actor)
}

/// POST /admin/user/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(ApiError::UsernameRequired);
    }
    if request.password.is_empty() {
        return Err(ApiError::PasswordRequired);
    }
    if let Err(retry_after) = state.login_throttle.check(username) {
        warn!(username, retry_after, "login throttled");
        return Err(ApiError::AuthFailed);
    }

    let repo = AdminUserRepository::new(state.pool.clone());
    let user: AdminUser = repo
        .find_by_username(username)
        .await?
        .ok_or(ApiError::UserNotExists)?
        .into();

    let matches = verify_password(&request.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(format!("password verification: {}", e)))?;
    if !matches {
        warn!(admin_id = user.id, "login failed, wrong password");
        return Err(ApiError::AuthFailed);
    }

    let issued = state
        .jwt
        .issue(user.id, &user.username, user.group.as_i16())
        .map_err(|e| ApiError::Internal(format!("token signing: {}", e)))?;

    info!(admin_id = user.id, jti = %issued.jti, "admin logged in");
    Ok(ApiResponse::ok(LoginResponse {
        id: user.id,
        token: issued.token,
        groupid: user.group.as_i16(),
    }))
}

/// GET /admin/user/getAllAdmin
pub async fn list_admins(
    State(state): State<AppState>,
    session: AdminSession,
) -> ApiResult<Vec<AdminUserItem>> {
    let repo = AdminUserRepository::new(state.pool.clone());
    if !repo.exists(session.admin_id).await? {
        return Err(ApiError::NotAuthorized);
    }

    let admins = repo
        .list()
        .await?
        .into_iter()
        .map(|entity| AdminUserItem::from(AdminUser::from(entity)))
        .collect();

    Ok(ApiResponse::ok(admins))
}

/// PUT /admin/user/addAdmin
///
/// New accounts always start in the normal admin group.
pub async fn add_admin(
    State(state): State<AppState>,
    session: AdminSession,
    AppJson(request): AppJson<AddAdminRequest>,
) -> EmptyResult {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(ApiError::UsernameRequired);
    }
    if request.password.is_empty() {
        return Err(ApiError::PasswordRequired);
    }

    let repo = AdminUserRepository::new(state.pool.clone());
    require_super_admin(&repo, &session).await?;

    if repo.username_exists(username).await? {
        return Err(ApiError::UsernameExists);
    }

    let user = NewAdminUser {
        id: state.ids.next_id(),
        username: username.to_string(),
        password_hash: hash(&request.password)?,
        group: AdminGroup::NormalAdmin,
    };
    repo.insert(&user).await.map_err(unique_violation_as_exists)?;

    info!(admin_id = session.admin_id, new_admin_id = user.id, "admin account added");
    Ok(ApiResponse::empty())
}

/// DELETE /admin/user/deleteAdmin
pub async fn delete_admin(
    State(state): State<AppState>,
    session: AdminSession,
    AppJson(request): AppJson<DeleteAdminRequest>,
) -> EmptyResult {
    if request.id <= 0 {
        return Err(ApiError::IdRequired);
    }

    let repo = AdminUserRepository::new(state.pool.clone());
    let actor = require_super_admin(&repo, &session).await?;
    if actor.id == request.id {
        return Err(ApiError::PermissionDenied);
    }

    if !repo.exists(request.id).await? {
        return Err(ApiError::UserNotExists);
    }
    repo.soft_delete(request.id).await?;

    info!(admin_id = actor.id, deleted_admin_id = request.id, "admin account deleted");
    Ok(ApiResponse::empty())
}

/// POST /admin/user/chAdmin
pub async fn modify_admin(
    State(state): State<AppState>,
    session: AdminSession,
    AppJson(request): AppJson<ModifyAdminRequest>,
) -> EmptyResult {
    if request.id <= 0 {
        return Err(ApiError::IdRequired);
    }
    request.validate_fields()?;

    let repo = AdminUserRepository::new(state.pool.clone());
    require_super_admin(&repo, &session).await?;

    let target: AdminUser = repo
        .find_by_id(request.id)
        .await?
        .ok_or(ApiError::UserNotExists)?
        .into();

    let username = request.username.map(|u| u.trim().to_string());
    if let Patch::Set(name) = &username {
        if *name != target.username && repo.username_exists(name).await? {
            return Err(ApiError::UsernameExists);
        }
    }

    let password_hash = match &request.password {
        Patch::Set(password) => Patch::Set(hash(password)?),
        Patch::Unchanged => Patch::Unchanged,
    };

    let changes = AdminUserChanges {
        username,
        password_hash,
        group: request.groupid.filter_map(AdminGroup::from_i16),
    };

    if repo
        .update(target.id, &changes)
        .await
        .map_err(unique_violation_as_exists)?
        == 0
    {
        return Err(ApiError::UserNotExists);
    }

    info!(admin_id = session.admin_id, modified_admin_id = target.id, "admin account modified");
    Ok(ApiResponse::empty())
}

/// A concurrent insert can still hit the unique username index.
fn unique_violation_as_exists(err: sqlx::Error) -> ApiError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => ApiError::UsernameExists,
        _ => err.into(),
    }
}
