//! Admin token middleware.
//!
//! Clients send the token in a `Token` header; `Authorization: Bearer` is accepted too.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::AdminGroup;

pub const TOKEN_HEADER: &str = "Token";

/// The admin a request was authenticated as.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub admin_id: i64,
    pub username: String,
    pub group: AdminGroup,
    pub jti: String,
}

impl AdminSession {
    pub fn is_super(&self) -> bool {
        self.group.is_super()
    }

    /// Fails with `PermissionDenied` unless the session belongs to a super admin.
    pub fn require_super(&self) -> Result<(), ApiError> {
        if self.is_super() {
            Ok(())
        } else {
            Err(ApiError::PermissionDenied)
        }
    }
}

/// Pulls the raw token out of the request headers.
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty());

    token.or_else(|| {
        headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
    })
}

/// Validates a token against the signing key and turns its claims into a session.
pub fn authenticate(state: &AppState, token: &str) -> Result<AdminSession, ApiError> {
    let claims = state.jwt.validate(token).map_err(|e| {
        tracing::debug!(error = %e, "admin token rejected");
        ApiError::TokenInvalid
    })?;
    let admin_id = claims.admin_id().map_err(|_| ApiError::TokenInvalid)?;
    let group = AdminGroup::from_i16(claims.group).ok_or(ApiError::TokenInvalid)?;

    Ok(AdminSession {
        admin_id,
        username: claims.username,
        group,
        jti: claims.jti,
    })
}

/// Rejects the request with a `TokenInvalid` envelope unless it carries a valid token.
pub async fn require_admin_token(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let session = match token_from_headers(req.headers()) {
        Some(token) => authenticate(&state, token),
        None => Err(ApiError::TokenInvalid),
    };

    match session {
        Ok(session) => {
            tracing::Span::current().record("admin_id", session.admin_id);
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}
