use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use super::dto::{CreateTask, LocalTask, UpdateTask};
use super::model::{group_by_status, Task, TaskResponse};
use crate::error::ApiError;
use crate::routes::middleware_auth::AuthUser;
use crate::state::AppState;

#[derive(Serialize)]
struct DeletedResponse {
    message: &'static str,
}

/// Loads a task the caller is allowed to touch.
/// Unknown or malformed ids are 404, someone else's task is 401.
async fn owned_task(
    state: &AppState,
    user_id: Uuid,
    raw_id: &str,
    action: &str,
) -> Result<Task, ApiError> {
    let not_found = || ApiError::not_found("Task not found");
    let id = Uuid::parse_str(raw_id).map_err(|_| not_found())?;
    let task = state.store.find_task(id).await?.ok_or_else(not_found)?;

    if task.user_id != user_id {
        tracing::warn!(task_id = %id, user_id = %user_id, "cross-user task access rejected");
        return Err(ApiError::unauthorized(format!(
            "You can only {action} your own tasks"
        )));
    }

    Ok(task)
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateTask>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let new_task = body.validate()?;

    let task = state.store.create_task(user.id, new_task).await?;
    tracing::info!(task_id = %task.id, user_id = %user.id, "task created");

    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let tasks = state.store.list_tasks(user.id).await?;
    let response: Vec<TaskResponse> = tasks.into_iter().map(TaskResponse::from).collect();

    Ok(Json(response))
}

/// Tasks grouped into one column per status.
pub async fn board(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let tasks = state.store.list_tasks(user.id).await?;
    Ok(Json(group_by_status(tasks)))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTask>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let changes = body.validate()?;
    let task = owned_task(&state, user.id, &id, "update").await?;

    let updated = state
        .store
        .update_task(task.id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    tracing::info!(task_id = %updated.id, user_id = %user.id, "task updated");

    Ok(Json(TaskResponse::from(updated)))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let task = owned_task(&state, user.id, &id, "delete").await?;

    if !state.store.delete_task(task.id).await? {
        return Err(ApiError::not_found("Task not found"));
    }
    tracing::info!(task_id = %task.id, user_id = %user.id, "task deleted");

    Ok(Json(DeletedResponse {
        message: "Task deleted successfully",
    }))
}

/// Moves tasks a guest kept in the browser into the caller's account,
/// then returns the whole board. Either every task is stored or none is.
pub async fn sync(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<Vec<LocalTask>>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(local_tasks) = payload?;

    let new_tasks = local_tasks
        .into_iter()
        .enumerate()
        .map(|(i, local)| {
            local
                .validate()
                .map_err(|e| ApiError::bad_request(format!("task {i}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let count = new_tasks.len();
    if count > 0 {
        state.store.create_tasks(user.id, new_tasks).await?;
    }
    tracing::info!(user_id = %user.id, count, "local tasks synced");

    let tasks = state.store.list_tasks(user.id).await?;
    Ok(Json(group_by_status(tasks)))
}
