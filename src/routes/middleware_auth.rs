use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// The caller behind a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("missing user"))
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req)
        .ok_or_else(|| ApiError::unauthorized("missing token"))?
        .to_string();

    let claims = state.keys.verify(&token).map_err(|e| {
        tracing::debug!(error = %e, "JWT decode error");
        ApiError::unauthorized("invalid token")
    })?;

    let user_id =
        Uuid::parse_str(&claims.sub).map_err(|_| ApiError::unauthorized("invalid subject"))?;
    let expires_at = claims
        .expires_at()
        .ok_or_else(|| ApiError::unauthorized("invalid expiry"))?;

    if state.store.is_token_revoked(&token).await? {
        return Err(ApiError::unauthorized("token has been revoked"));
    }

    req.extensions_mut().insert(AuthUser {
        id: user_id,
        username: claims.username.clone(),
        expires_at,
        token,
    });

    Ok(next.run(req).await)
}
