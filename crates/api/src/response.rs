//! Success envelope.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// `{"code": 0, "msg": "ok", "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: i32,
    pub msg: &'static str,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok",
            data,
        }
    }
}

impl ApiResponse<Option<()>> {
    /// Success without a payload (`data: null`).
    pub fn empty() -> Self {
        Self::ok(None)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Handler result carrying the envelope either way.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

/// Result of handlers that answer `data: null`.
pub type EmptyResult = ApiResult<Option<()>>;
