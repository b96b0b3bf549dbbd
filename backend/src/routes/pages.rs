//! HTML routes. Mutations always redirect to `/`; an empty title on `/add`
//! is dropped without feedback.

use axum::{
    extract::{rejection::FormRejection, Path, Query, State},
    response::{Html, Response},
    routing::{get, post},
    Form, Router,
};
use todo_shared::{CreateTodoRequest, Filter};

use super::{redirect_home, ListParams};
use crate::error::ApiResult;
use crate::render;
use crate::state::AppState;

/// GET /
async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Html<String>> {
    let filter = Filter::parse_lenient(params.filter.as_deref());
    let (todos, counts) = state
        .store
        .call(move |s| Ok((s.list(filter)?, s.counts()?)))
        .await?;

    Ok(Html(render::index_page(&todos, filter, counts)))
}

/// POST /add
///
/// A body that is not a urlencoded form is treated as an empty submission.
async fn add(
    State(state): State<AppState>,
    payload: Result<Form<CreateTodoRequest>, FormRejection>,
) -> ApiResult<Response> {
    let req = match payload {
        Ok(Form(req)) => req,
        Err(rejection) => {
            tracing::debug!(status = %rejection.status(), "unreadable form body");
            CreateTodoRequest::default()
        }
    };

    match req.validate() {
        Ok(new) => {
            let id = state.store.call(move |s| s.add(&new)).await?;
            tracing::debug!(id, "todo added");
        }
        Err(e) => tracing::debug!(error = %e, "ignoring form submission"),
    }
    Ok(redirect_home())
}

/// GET /toggle/:id
async fn toggle(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    if !state.store.call(move |s| s.toggle(id)).await? {
        tracing::debug!(id, "toggle of unknown todo");
    }
    Ok(redirect_home())
}

/// GET /delete/:id
async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    if !state.store.call(move |s| s.delete(id)).await? {
        tracing::debug!(id, "delete of unknown todo");
    }
    Ok(redirect_home())
}

/// GET /clear-completed
async fn clear_completed(State(state): State<AppState>) -> ApiResult<Response> {
    let removed = state.store.call(|s| s.clear_completed()).await?;
    tracing::info!(removed, "cleared completed todos");
    Ok(redirect_home())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/add", post(add))
        .route("/toggle/:id", get(toggle))
        .route("/delete/:id", get(delete))
        .route("/clear-completed", get(clear_completed))
}
