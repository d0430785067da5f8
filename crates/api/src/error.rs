use axum::{
    extract::multipart::MultipartError,
    extract::rejection::{FormRejection, JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Business errors. Every one of them is answered with HTTP 200 and an envelope whose
/// `code` tells the client what happened.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Storage or I/O failure. The detail is logged, never sent.
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Token invalid")]
    TokenInvalid,

    #[error("Id required")]
    IdRequired,

    #[error("Delete failed")]
    DeleteFailed,

    #[error("Query failed")]
    QueryFailed,

    #[error("Invalid id")]
    InvalidId,

    #[error("Platform header malformed")]
    PlatformMissing,

    #[error("Not authorized")]
    NotAuthorized,

    #[error("Authentication failed")]
    AuthFailed,

    #[error("Username required")]
    UsernameRequired,

    #[error("Password required")]
    PasswordRequired,

    #[error("Username exists")]
    UsernameExists,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("User does not exist")]
    UserNotExists,

    #[error("Content empty")]
    ContentEmpty,

    #[error("Changelog not found")]
    LogNotFound,

    #[error("Announcement publish failed")]
    AnnouncementPublishFailed,

    #[error("Version operation failed")]
    VersionOperationFailed,

    /// Malformed or invalid input. The detail is logged at debug level.
    #[error("Parameter wrong: {0}")]
    ParamWrong(String),
}

impl ApiError {
    pub fn code(&self) -> i32 {
        match self {
            ApiError::Internal(_) => 1,
            ApiError::TokenInvalid => 10001,
            ApiError::IdRequired => 10002,
            ApiError::DeleteFailed => 10003,
            ApiError::QueryFailed => 10004,
            ApiError::InvalidId => 10005,
            ApiError::PlatformMissing => 10006,
            ApiError::NotAuthorized => 20200,
            ApiError::AuthFailed => 20201,
            ApiError::UsernameRequired => 20202,
            ApiError::PasswordRequired => 20203,
            ApiError::UsernameExists => 20204,
            ApiError::PermissionDenied => 20205,
            ApiError::UserNotExists => 20206,
            ApiError::ContentEmpty => 20300,
            ApiError::LogNotFound => 20301,
            ApiError::AnnouncementPublishFailed => 20302,
            ApiError::VersionOperationFailed => 50100,
            ApiError::ParamWrong(_) => 50101,
        }
    }

    /// Client-facing message.
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::Internal(_) => "内部错误",
            ApiError::TokenInvalid => "token无效",
            ApiError::IdRequired => "id不能为空",
            ApiError::DeleteFailed => "删除失败",
            ApiError::QueryFailed => "查询失败",
            ApiError::InvalidId => "id错误",
            ApiError::PlatformMissing => "header中平台参数不正确",
            ApiError::NotAuthorized => "登陆数据缺失",
            ApiError::AuthFailed => "用户名或密码错误",
            ApiError::UsernameRequired => "账号不能为空",
            ApiError::PasswordRequired => "密码不能为空",
            ApiError::UsernameExists => "用户名已存在",
            ApiError::PermissionDenied => "没有权限",
            ApiError::UserNotExists => "没有找到用户",
            ApiError::ContentEmpty => "内容不能都为空",
            ApiError::LogNotFound => "找不到此日志",
            ApiError::AnnouncementPublishFailed => "发布公告失败",
            ApiError::VersionOperationFailed => "版本信息操作失败",
            ApiError::ParamWrong(_) => "参数错误",
        }
    }

    pub fn param(detail: impl Into<String>) -> Self {
        ApiError::ParamWrong(detail.into())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: i32,
    msg: &'static str,
    data: Option<()>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(detail) => tracing::error!("Internal error: {}", detail),
            ApiError::ParamWrong(detail) => tracing::debug!("Rejected request: {}", detail),
            other => tracing::debug!(code = other.code(), "Request failed: {}", other),
        }

        let body = ErrorBody {
            code: self.code(),
            msg: self.message(),
            data: None,
        };

        (StatusCode::OK, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(format!("Database error: {}", err))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let reasons: Vec<String> = errs
                    .iter()
                    .map(|e| e.message.clone().map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string()))
                    .collect();
                format!("{}: {}", field, reasons.join(", "))
            })
            .collect();
        ApiError::ParamWrong(if fields.is_empty() {
            errors.to_string()
        } else {
            fields.join("; ")
        })
    }
}

impl From<validator::ValidationError> for ApiError {
    fn from(error: validator::ValidationError) -> Self {
        ApiError::ParamWrong(
            error
                .message
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string()),
        )
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::ParamWrong(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::ParamWrong(rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::ParamWrong(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::ParamWrong(err.body_text())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Internal(format!("I/O error: {}", err))
    }
}
