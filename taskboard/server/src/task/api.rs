use crate::task::{TaskService, TaskState};
use crate::web::ApiError;
use axum::{
    Router,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use taskboard_core::{CreateTaskInput, Task, TaskFilter, UpdateTaskInput};
use uuid::Uuid;

/// An ID that is not a UUID cannot name a stored task.
fn parse_task_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::TaskNotFound(raw.to_string()))
}

/// Handler for POST /tasks.
#[tracing::instrument(skip(state))]
pub async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(body) = body?;
    let input = CreateTaskInput::from_json(&body)?;

    let service = TaskService::new(&state.db);
    let task = service.create_task(input).await?;
    tracing::info!("Created task {}", task.id);
    Ok((StatusCode::CREATED, Json(task)))
}

/// Handler for GET /tasks, optionally filtered by `status` and `priority`.
#[tracing::instrument(skip(state))]
pub async fn list_tasks_handler(
    State(state): State<Arc<TaskState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let Query(pairs) = query?;
    let filter =
        TaskFilter::from_query_pairs(pairs.iter().map(|(key, value)| (key.as_str(), value.as_str())))?;

    let service = TaskService::new(&state.db);
    let tasks = service.list_tasks(filter).await?;
    Ok(Json(tasks))
}

/// Handler for GET /tasks/{id}.
#[tracing::instrument(skip(state))]
pub async fn get_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_task_id(&id)?;
    let service = TaskService::new(&state.db);
    let task = service.get_task_by_id(id).await?;
    Ok(Json(task))
}

/// Handler for PATCH /tasks/{id}.
///
/// A request without a `Content-Type` carries no changes and is treated as `{}`.
#[tracing::instrument(skip(state))]
pub async fn update_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
    body: Result<Option<Json<Value>>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let body = body?
        .map(|Json(body)| body)
        .unwrap_or_else(|| Value::Object(Map::new()));
    let patch = UpdateTaskInput::from_json(&body)?;
    let id = parse_task_id(&id)?;

    let service = TaskService::new(&state.db);
    let task = service.update_task_by_id(id, patch).await?;
    Ok(Json(task))
}

/// Handler for DELETE /tasks/{id}.
#[tracing::instrument(skip(state))]
pub async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_task_id(&id)?;
    let service = TaskService::new(&state.db);
    let deleted = service.delete_task_by_id(id).await?;
    tracing::info!("Deleted task {}", deleted.id);
    Ok(StatusCode::NO_CONTENT)
}

/// Creates the task router.
pub fn create_task_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/{id}",
            get(get_task_handler)
                .patch(update_task_handler)
                .delete(delete_task_handler),
        )
        .with_state(state)
}
