use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use tokio::task::spawn_blocking;

use super::{
    hash_password, verify_password, LoginRequest, LoginResponse, MessageResponse,
    RegisterResponse, RegistrationRequest, MIN_PASSWORD_LEN,
};
use crate::error::ApiError;
use crate::routes::middleware_auth::AuthUser;
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let username = payload.username.trim().to_string();

    if username.is_empty() {
        return Err(ApiError::bad_request("username should not be empty"));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password = payload.password;
    let password_hash = spawn_blocking(move || hash_password(&password))
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::internal)?;

    let user = state.store.create_user(&username, &password_hash).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            username: user.username,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;

    let user = state
        .store
        .find_user_by_username(payload.username.trim())
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let password = payload.password;
    let password_hash = user.password_hash.clone();
    let valid = spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(ApiError::internal)?;

    if !valid {
        tracing::info!(username = %user.username, "login rejected");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let access_token = state
        .keys
        .issue(user.id, &user.username)
        .map_err(ApiError::internal)?;

    Ok(Json(LoginResponse { access_token }))
}

/// Revokes the presented token for the rest of its lifetime.
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    state.store.revoke_token(&user.token, user.expires_at).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "token revoked");

    Ok(Json(MessageResponse {
        message: "Logged out successfully",
    }))
}
