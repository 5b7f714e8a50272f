use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{
    error::ApiError,
    schema::{parse_body, CreateTodoSchema, UpdateTodoSchema},
    AppState,
};

pub const API_VERSION: &str = "1.0.0";

// Handler for the health checker route
pub async fn health_checker_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": API_VERSION
    }))
}

// Handler for getting all Todo items
pub async fn get_todos(State(data): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let todos = data.repo.list().await?;
    tracing::debug!(count = todos.len(), "todos listed");
    Ok(Json(todos))
}

// Handler for creating a new Todo
pub async fn create_todo(
    State(data): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let new_todo = parse_body::<CreateTodoSchema>(&headers, &body)?.validate()?;

    let todo = data.repo.create(new_todo).await?;
    tracing::info!(id = todo.id, "todo created");

    Ok((StatusCode::CREATED, Json(todo)))
}

// Handler for updating a Todo by ID; only supplied fields change
pub async fn update_todo(
    id: Result<Path<i32>, PathRejection>,
    State(data): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;
    let changes = parse_body::<UpdateTodoSchema>(&headers, &body)?.validate()?;
    tracing::debug!(id, ?changes, "updating todo");

    let todo = data
        .repo
        .update(id, changes)
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(id, "todo updated");

    Ok(Json(todo))
}

// Handler for deleting a Todo by ID
pub async fn delete_todo(
    id: Result<Path<i32>, PathRejection>,
    State(data): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;

    let todo = data.repo.delete(id).await?.ok_or(ApiError::NotFound)?;
    tracing::info!(id, "todo deleted");

    Ok(Json(json!({
        "message": "Todo deleted",
        "todo": todo
    })))
}
