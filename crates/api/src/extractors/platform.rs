//! `Platform` request header used by the public client endpoints.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use shared::validation::validate_platform;

use crate::error::ApiError;

pub const PLATFORM_HEADER: &str = "Platform";

/// Optional platform; `None` when the header is absent or blank and the caller wants
/// every platform.
#[derive(Debug, Clone)]
pub struct PlatformHeader(pub Option<String>);

/// Platform that must be present; a missing header is `ParamWrong`.
#[derive(Debug, Clone)]
pub struct RequiredPlatform(pub String);

fn read_platform(parts: &Parts) -> Result<Option<String>, ApiError> {
    let Some(raw) = parts.headers.get(PLATFORM_HEADER) else {
        return Ok(None);
    };
    let value = raw.to_str().map_err(|_| ApiError::PlatformMissing)?.trim();
    if value.is_empty() {
        return Ok(None);
    }
    validate_platform(value).map_err(|_| ApiError::PlatformMissing)?;
    Ok(Some(value.to_string()))
}

#[async_trait]
impl<S> FromRequestParts<S> for PlatformHeader
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        read_platform(parts).map(PlatformHeader)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequiredPlatform
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        read_platform(parts)?
            .map(RequiredPlatform)
            .ok_or_else(|| ApiError::ParamWrong("Platform header is required".to_string()))
    }
}
