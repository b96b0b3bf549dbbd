//! JSON API.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use todo_shared::{CreateTodoRequest, Filter, Todo};

use super::ListParams;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/todos
async fn list_todos(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Todo>>> {
    let filter = Filter::parse_lenient(params.filter.as_deref());
    let todos = state.store.call(move |s| s.list(filter)).await?;
    Ok(Json(todos))
}

/// POST /api/todos
async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let Json(req) = payload?;
    let new = req.validate()?;
    let todo = state.store.call(move |s| s.create(&new)).await?;

    tracing::debug!(id = todo.id, "todo created via api");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/todos", get(list_todos).post(create_todo))
}
