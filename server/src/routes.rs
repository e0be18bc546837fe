use axum::{extract::Path, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult, ErrorDetail};
use crate::model::Todo;
use crate::session::DbSession;

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Liveness greeting"))
)]
pub async fn read_root() -> Json<Value> {
    Json(json!({ "Hello": "World" }))
}

#[utoipa::path(
    get,
    path = "/todos/",
    responses((status = 200, description = "Every stored todo", body = [Todo]))
)]
pub async fn list_todos(mut session: DbSession) -> ApiResult<Json<Vec<Todo>>> {
    let todos = sqlx::query_as::<_, Todo>("SELECT id, content FROM todo")
        .fetch_all(&mut *session)
        .await?;
    Ok(Json(todos))
}

/// Any `id` in the body is ignored; the database assigns one.
#[utoipa::path(
    post,
    path = "/todos/",
    request_body = Todo,
    responses((status = 200, description = "The stored todo with its id", body = Todo))
)]
pub async fn create_todo(mut session: DbSession, Json(input): Json<Todo>) -> ApiResult<Json<Todo>> {
    let todo = sqlx::query_as::<_, Todo>(
        "INSERT INTO todo (content) VALUES ($1) RETURNING id, content",
    )
    .bind(input.content)
    .fetch_one(&mut *session)
    .await?;

    tracing::debug!(id = ?todo.id, "Created todo");
    Ok(Json(todo))
}

/// The row is identified by the path; only `content` is taken from the body.
#[utoipa::path(
    put,
    path = "/todos/{task_id}",
    params(("task_id" = i64, Path, description = "Id of the todo to update")),
    request_body = Todo,
    responses(
        (status = 200, description = "The updated todo", body = Todo),
        (status = 404, description = "No todo has this id", body = ErrorDetail)
    )
)]
pub async fn update_todo(
    Path(task_id): Path<i64>,
    mut session: DbSession,
    Json(input): Json<Todo>,
) -> ApiResult<Json<Todo>> {
    let todo = sqlx::query_as::<_, Todo>(
        "UPDATE todo SET content = $1 WHERE id = $2 RETURNING id, content",
    )
    .bind(input.content)
    .bind(task_id)
    .fetch_optional(&mut *session)
    .await?
    .ok_or(ApiError::NotFound)?;

    tracing::debug!(id = task_id, "Updated todo");
    Ok(Json(todo))
}

#[utoipa::path(
    delete,
    path = "/todos/{task_id}",
    params(("task_id" = i64, Path, description = "Id of the todo to delete")),
    responses(
        (status = 200, description = "Deleted, empty body"),
        (status = 404, description = "No todo has this id", body = ErrorDetail)
    )
)]
pub async fn delete_todo(Path(task_id): Path<i64>, mut session: DbSession) -> ApiResult<StatusCode> {
    let result = sqlx::query("DELETE FROM todo WHERE id = $1")
        .bind(task_id)
        .execute(&mut *session)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }

    tracing::debug!(id = task_id, "Deleted todo");
    Ok(StatusCode::OK)
}
