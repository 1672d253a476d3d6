//! Route handlers for `/` and `/api/tasks`.

use crate::error::{ApiError, MessageBody};
use crate::store::TaskStore;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value;
use taskboard_core::{parse_task_id, NewTask, Task, TaskPatch};

pub const LIVENESS_MESSAGE: &str = "Task API is running";
pub const DELETED_MESSAGE: &str = "Task deleted";
pub const BODY_NOT_OBJECT: &str = "request body must be a JSON object";

/// Decodes a JSON body that must be an object.
///
/// Derived struct deserializers also accept sequences, so `["t"]` would
/// otherwise bind positionally to `{title}`.
fn object_body<T: DeserializeOwned>(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<T, ApiError> {
    let Json(value) = payload?;
    if !value.is_object() {
        return Err(ApiError::BadRequest(BODY_NOT_OBJECT.to_string()));
    }
    serde_json::from_value(value).map_err(|err| {
        ApiError::BadRequest(format!(
            "Failed to deserialize the JSON body into the target type: {err}"
        ))
    })
}

/// `GET /`
pub async fn root() -> Json<MessageBody> {
    Json(MessageBody::new(LIVENESS_MESSAGE))
}

/// `GET /api/tasks` - all tasks, newest first.
pub async fn list_tasks(State(store): State<TaskStore>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = store.run(|service| service.list_tasks()).await?;
    Ok(Json(tasks))
}

/// `GET /api/tasks/{id}`
pub async fn get_task(
    State(store): State<TaskStore>,
    Path(raw_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_task_id(&raw_id)?;
    let task = store.run(move |service| service.get_task(id)).await?;
    Ok(Json(task))
}

/// `POST /api/tasks` - `{title, description}` -> 201 with the stored task.
pub async fn create_task(
    State(store): State<TaskStore>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let input: NewTask = object_body(payload)?;
    let task = store
        .run(move |service| service.create_task(&input))
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /api/tasks/{id}` - partial update, returns the merged task.
pub async fn update_task(
    State(store): State<TaskStore>,
    Path(raw_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_task_id(&raw_id)?;
    let patch: TaskPatch = object_body(payload)?;
    let task = store
        .run(move |service| service.update_task(id, &patch))
        .await?;
    Ok(Json(task))
}

/// `DELETE /api/tasks/{id}`
pub async fn delete_task(
    State(store): State<TaskStore>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let id = parse_task_id(&raw_id)?;
    store.run(move |service| service.delete_task(id)).await?;
    Ok(Json(MessageBody::new(DELETED_MESSAGE)))
}
